//! `bizflow serve` — start the HTTP backend server.

pub async fn run(
    host: String,
    port: u16,
    data_dir: Option<String>,
    declarations: Option<String>,
    static_dir: Option<String>,
) -> Result<(), String> {
    let config = bizflow_server::ServerConfig {
        host: host.clone(),
        port,
        storage_dir: data_dir,
        declarations_dir: declarations,
        static_dir,
    };

    println!("Starting bizflow server on {}:{}...", host, port);

    let state = bizflow_server::create_app_state(&config)?;
    let addr = bizflow_server::start_server_with_state(config, state).await?;
    println!("bizflow server listening on http://{}", addr);

    // Keep the process running until interrupted
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| format!("Failed to listen for Ctrl+C: {}", e))?;

    println!("\nShutting down...");
    Ok(())
}
