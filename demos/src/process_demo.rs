use std::env;

use dotenv::dotenv;
use invoiceai::prelude::*;

/// Signs in, submits an invoice document, and prints the extracted report
/// plus the session history.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let base_url = env::var("INVOICEAI_URL").expect("INVOICEAI_URL must be set");
    let api_key = env::var("INVOICEAI_KEY").expect("INVOICEAI_KEY must be set");
    let email = env::var("INVOICEAI_EMAIL").expect("INVOICEAI_EMAIL must be set");
    let password = env::var("INVOICEAI_PASSWORD").expect("INVOICEAI_PASSWORD must be set");

    let path = env::args()
        .nth(1)
        .expect("usage: process_demo <invoice.pdf|invoice.xml>");

    let client = InvoiceAi::new(&base_url, &api_key);
    client.auth().login(&email, &password).await?;

    let mut dashboard = client.dashboard();

    // Print the synthesized progress while the upload runs.
    let mut uploads = dashboard.subscribe_uploads();
    let progress = tokio::spawn(async move {
        while uploads.changed().await.is_ok() {
            let state = uploads.borrow_and_update().clone();
            match state {
                UploadState::Uploading { progress, ref file_name } => {
                    println!("processing {file_name}: {progress}%");
                }
                UploadState::Succeeded => println!("done"),
                UploadState::Failed { ref message } => println!("failed: {message}"),
                UploadState::Idle => {}
            }
        }
    });

    let file = InvoiceFile::from_path(&path).await?;
    let record = dashboard.process_file(file).await?;
    println!("recorded {} at {}", record.id, record.received_at);

    if let Some(report) = dashboard.report() {
        println!();
        println!("{report}");
        println!("JSON: {}", report.to_json()?);
    }

    println!("history ({} records):", dashboard.history().len());
    for entry in dashboard.history().list() {
        println!("  {} {}", entry.id, entry.file_name);
    }

    client.auth().logout().await?;
    progress.abort();

    Ok(())
}
