use anyhow::{Context, Result};

use crate::client::ApiClient;
use crate::models::{LoginRequest, Pagination};

/// Sign in and print the account the API returned
pub async fn login(client: &ApiClient, login: &str, password: &str) -> Result<()> {
    let response = client
        .auth()
        .login(&LoginRequest {
            login: login.to_string(),
            password: password.to_string(),
        })
        .await
        .context("Login failed")?;

    match &response.user {
        Some(user) => println!(
            "Signed in as {} ({})",
            user.username,
            user.role.display_name()
        ),
        None => println!("Signed in"),
    }

    Ok(())
}

/// List accounts (admin only)
pub async fn users(client: &ApiClient, pagination: Pagination) -> Result<()> {
    let list = client
        .admin()
        .get_users(pagination)
        .await
        .context("Failed to list users")?;

    println!(
        "Users (page {} of {}, {} total)",
        list.page,
        list.total.div_ceil(u64::from(list.limit.max(1))).max(1),
        list.total
    );
    println!("================================");

    for user in &list.users {
        println!(
            "{:>6}  {:<20} {:<14} {}",
            user.id,
            user.username,
            user.role.display_name(),
            if user.is_active { "active" } else { "blocked" }
        );
    }

    Ok(())
}
