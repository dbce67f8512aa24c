use ez::commands::run_app;
use ez::ux;

#[tokio::main]
async fn main() {
    if let Err(e) = run_app().await {
        ux::present_error(&e);
        std::process::exit(1);
    }
}
