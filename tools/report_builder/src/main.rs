use report_core::config::ReportConfig;
use report_core::report::builder::ReportGenerator;
use report_core::report::read_analysis_json;

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("usage: report_builder <path/to/analysis.json> [session_id]");
        std::process::exit(2);
    }
    let path = std::path::Path::new(&args[1]);
    let session_id = args.get(2).map(String::as_str);

    let config = match ReportConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("config error: {}", e);
            std::process::exit(2);
        }
    };
    let data = match read_analysis_json(path) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("cannot read analysis {}: {}", path.display(), e);
            std::process::exit(1);
        }
    };

    let generator = ReportGenerator::new(config);
    let report = generator.generate_clean_report(&data, session_id);
    match report.to_json_pretty() {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("report serialization error: {}", e);
            std::process::exit(1);
        }
    }
}
