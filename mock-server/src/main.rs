use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    println!("mock upstream on http://{addr}");
    println!("  api      http://{addr}/v2/");
    println!("  oauth2   http://{addr}/oauth2/access_token (code: {})", mock_server::VALID_CODE);
    println!("  geocode  http://{addr}/maps/api/geocode/json");
    mock_server::run(listener).await
}
