use clap::Parser;

/// This is a tabulation program for ranked ballots.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The file containing the election description in JSON.
    /// See the manual of the preference_voting crate for the format.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,
    /// (file path) A summary written by an earlier run. The run fails, printing the differences,
    /// when the new summary does not match it.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) Where to write the JSON summary. Takes precedence over the
    /// output directory of the configuration. Without either, the summary goes to the standard output.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path or empty) The file with the form responses. Setting this option overrides the file path
    /// that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (csv or xlsx, default inferred from the file extension) The type of the input.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// When using an Excel file, indicates the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// If passed as an argument, the round by round trace of the instant-runoff count is included in the output.
    #[clap(long, takes_value = false)]
    pub trace: bool,

    // Other arguments
    /// Debug logging, unless RUST_LOG says otherwise.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
