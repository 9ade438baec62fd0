use clap::{Parser, Subcommand};

mod x509cmd;

/// Passive X.509 certificate metadata extraction.
#[derive(Parser)]
#[command(name = "mercury")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode certificates and emit one JSON record per certificate.
    X509 {
        /// Input file: PEM, or raw DER for a single certificate.
        #[arg(short, long)]
        input: String,
        /// Emit only the serial number and issuer of each certificate.
        #[arg(long)]
        prefix: bool,
        /// Emit the raw certificate prefix bytes as hex.
        #[arg(long = "prefix-hex")]
        prefix_hex: bool,
        /// Only emit certificates whose public key uses a weak EC curve.
        #[arg(long)]
        weak: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::X509 {
            input,
            prefix,
            prefix_hex,
            weak,
        } => x509cmd::run(input, *prefix, *prefix_hex, *weak),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
