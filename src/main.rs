#[tokio::main]
async fn main() {
    cabin_booking::run().await;
}
