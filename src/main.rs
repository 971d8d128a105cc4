use umklapp::app::run;
fn main() {
    run().unwrap();
}
