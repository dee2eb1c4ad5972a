use std::env;

use dotenv::dotenv;
use invoiceai::prelude::*;

/// Walks the auth flow end to end: register, sign out, sign back in, and
/// watch the router follow the auth-state changes.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let base_url = env::var("INVOICEAI_URL").expect("INVOICEAI_URL must be set");
    let api_key = env::var("INVOICEAI_KEY").expect("INVOICEAI_KEY must be set");
    let email = env::var("INVOICEAI_EMAIL").unwrap_or_else(|_| "demo@example.com".to_string());
    let password = env::var("INVOICEAI_PASSWORD").unwrap_or_else(|_| "password123".to_string());

    let client = InvoiceAi::new(&base_url, &api_key);
    let auth = client.auth();

    let mut router = Router::new();
    println!("view: {:?}", router.view());

    auth.resolve_initial();
    router.apply(auth.snapshot());
    println!("view after initial resolution: {:?}", router.view());

    router.get_started();
    router.switch_to_register();
    println!("view on get started: {:?}", router.view());

    match auth.register(&email, &password, &password).await {
        Ok(session) => println!("registered {}", session.user.id),
        Err(err) => {
            println!("register failed ({err}), trying login");
            let session = auth.login(&email, &password).await?;
            println!("signed in as {}", session.user.id);
        }
    }

    router.apply(auth.snapshot());
    println!("view once signed in: {:?}", router.view());

    if let Some(user) = auth.current_user() {
        println!("current user: {:?}", user.email);
    }

    auth.logout().await?;
    router.apply(auth.snapshot());
    println!("view after logout: {:?}", router.view());

    Ok(())
}
