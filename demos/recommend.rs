use std::error::Error;

#[path = "common/corpus.rs"]
mod corpus;

fn main() -> Result<(), Box<dyn Error>> {
    apprec::example_apps::run_recommend(std::env::args().skip(1), corpus::build_demo_corpus)
}
