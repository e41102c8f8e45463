use randcheck_tests::REGISTRY;

pub fn run() {
    println!("{} registered test(s):\n", REGISTRY.len());
    println!("  {:<36} {:>10}  Name", "Identifier", "Min bits");
    for entry in &REGISTRY {
        println!("  {:<36} {:>10}  {}", entry.id, entry.min_bits, entry.name);
    }
}
