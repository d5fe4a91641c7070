use colored::*;

pub fn display_success(message: &str) {
    println!("{} {}", "✅".green(), message);
}

pub fn display_error(message: &str) {
    eprintln!("{} {}", "❌".red(), message.red());
}

/// Print a fatal error with actionable suggestions for the common API
/// failure shapes (bad token, quota, connectivity).
pub fn display_fatal(error: &anyhow::Error) {
    display_error(&format!("{:#}", error));

    let text = error.to_string().to_lowercase();
    let chain = format!("{:#}", error).to_lowercase();

    let suggestions: &[&str] = if chain.contains("no configuration found") {
        &["Run: genshell config --api-token <your-token>"]
    } else if chain.contains("401") || chain.contains("unauthorized") || chain.contains("api key") {
        &[
            "Check that your API token is valid and not expired",
            "Re-run: genshell config --api-token <your-token>",
        ]
    } else if chain.contains("429") || chain.contains("quota") || chain.contains("rate limit") {
        &["Wait a moment and try again", "Check your API usage limits"]
    } else if text.contains("connect") || chain.contains("timed out") || chain.contains("network") {
        &["Check your internet connection", "Try again in a moment"]
    } else {
        &[]
    };

    if !suggestions.is_empty() {
        eprintln!();
        eprintln!("{} {}", "💡".cyan(), "Suggested solutions:".bold());
        for suggestion in suggestions {
            eprintln!("  • {}", suggestion);
        }
    }
}
