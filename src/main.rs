use std::io::{self, BufRead, Write};

use anyhow::Context;
use settings_vault_lib::bootstrap;
use settings_vault_lib::demo::{open_demo_stores, AppSettings, CredentialsSettings};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut context = bootstrap()?;
    open_demo_stores(&mut context).await?;

    let app = context
        .settings::<AppSettings>()
        .context("app settings store is not registered")?;
    let credentials = context
        .settings::<CredentialsSettings>()
        .context("credentials store is not registered")?;

    println!("=== settings-vault demo ===");
    println!("Settings directory: {}", context.paths().settings_dir.display());
    app.read(|s| {
        println!("App theme: {}", s.theme());
        println!("Launch count: {}", s.launch_count());
    });
    credentials.read(|c| println!("Stored API key (decrypted): {}", c.api_key()));

    app.update(|s| {
        s.record_launch();
        s.toggle_theme();
    });

    let input = tokio::task::spawn_blocking(prompt_api_key)
        .await
        .context("API key prompt panicked")??;
    if let Some(api_key) = input {
        credentials.update(|c| c.set_api_key(api_key));
    }

    context.flush_all().await;
    info!("demo settings flushed");
    println!("Settings saved. Run again to see the persisted values.");

    Ok(())
}

fn prompt_api_key() -> anyhow::Result<Option<String>> {
    print!("Enter new API key (or leave empty to keep): ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let trimmed = line.trim();

    Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
}
