//! Account commands.
//!
//! # Usage
//!
//! ```bash
//! yasira account login admin@yasira.com --password admin123
//! yasira account google
//! yasira account register --name "Amira" amira@example.com
//! yasira account update --name "Amira K."
//! yasira account whoami
//! yasira account logout
//! ```

use yasira_storefront::{UserProfile, UserProfileUpdate};

use super::{CommandError, Context};

/// Sign in against the demo accounts.
pub fn login(ctx: &mut Context, email: &str, password: &str) -> Result<(), CommandError> {
    let profile = ctx.state.login(email, password)?;
    ctx.say(&format!("Signed in as {} ({})", profile.name, profile.role));
    Ok(())
}

/// Sign in with the simulated Google account.
pub fn google(ctx: &mut Context) -> Result<(), CommandError> {
    let profile = ctx.state.login_with_google()?;
    ctx.say(&format!("Signed in as {} <{}>", profile.name, profile.email.as_str()));
    Ok(())
}

/// Create an account and sign in.
pub fn register(ctx: &mut Context, name: &str, email: &str) -> Result<(), CommandError> {
    let profile = ctx.state.register(name, email)?;
    ctx.say(&format!("Welcome, {}! Your account ID is {}", profile.name, profile.id));
    Ok(())
}

/// Edit the signed-in profile.
pub fn update(ctx: &mut Context, update: UserProfileUpdate) -> Result<(), CommandError> {
    let profile = ctx.state.update_profile(update)?;
    ctx.say(&format!("Profile updated: {}", describe(&profile)));
    Ok(())
}

/// Sign out.
pub fn logout(ctx: &mut Context) {
    if ctx.state.logout() {
        ctx.say("Signed out");
    } else {
        ctx.say("Not signed in");
    }
}

/// Print the signed-in user.
#[allow(clippy::print_stdout)]
pub fn whoami(ctx: &Context) -> Result<(), CommandError> {
    let user = ctx.state.session().current_user();
    if ctx.json {
        return super::print_json(&user);
    }
    match user {
        Some(profile) => println!("{}", describe(profile)),
        None => println!("Not signed in"),
    }
    Ok(())
}

fn describe(profile: &UserProfile) -> String {
    format!(
        "{} <{}> [{}] id {}",
        profile.name,
        profile.email.as_str(),
        profile.role,
        profile.id
    )
}
