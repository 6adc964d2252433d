/// Display version information
pub fn execute() {
    println!("toxbot {}", env!("CARGO_PKG_VERSION"));
    println!("Always-on Tox presence and echo bot");
    if cfg!(feature = "toxcore") {
        println!("engine: libtoxcore");
    } else {
        println!("engine: not compiled in (rebuild with --features toxcore)");
    }
}
