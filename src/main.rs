#[tokio::main]
async fn main() {
    if let Err(e) = droidpick_lib::run().await {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
