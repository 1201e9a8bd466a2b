use crate::ai::faq::FaqTable;

pub fn run() {
    println!("FAQ Topics:");
    for topic in FaqTable::store_defaults().topics() {
        println!("  - {}", topic);
    }
}
