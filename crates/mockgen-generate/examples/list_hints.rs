use mockgen_generate::FakerSource;

fn main() {
    for hint in FakerSource::list_hints() {
        println!("{hint}");
    }
}
