use anyhow::Result;
use clap::Parser;
use stepwise::cli::{Cli, OutputFormat};
use stepwise::config::StudyConfig;
use stepwise::csv_output::titled_tables_to_csv;
use stepwise::json_output::JsonReport;
use stepwise::study::Study;
use stepwise::table::TitledTable;
use stepwise::text_output::render_titled;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

fn print_tables(tables: Vec<TitledTable>, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            let rendered: Vec<String> = tables.iter().map(render_titled).collect();
            print!("{}", rendered.join("\n"));
        }
        OutputFormat::Json => println!("{}", JsonReport::new(tables).to_json()?),
        OutputFormat::Csv => print!("{}", titled_tables_to_csv(&tables)),
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Cli::parse();

    // Initialize tracing if --debug flag is set
    init_tracing(args.debug);

    let config = StudyConfig::from_file(&args.config)?;
    let study = Study::new(&config, args.dataset.as_deref())?;
    let tables = study.run(args.report)?;

    if tables.is_empty() {
        tracing::warn!(report = ?args.report, "no dataset provides input for this report");
    }

    print_tables(tables, args.format)
}
