use clap::Parser;

/// Long-range potential matrix elements on a distributed real-space grid
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Control parameters
    #[arg(long, default_value = "in.ctrl")]
    pub control: String,

    /// Crystal structure and species
    #[arg(long, default_value = "in.crystal")]
    pub crystal: String,

    /// Override the number of in-process ranks
    #[arg(short, long)]
    pub nranks: Option<usize>,
}
