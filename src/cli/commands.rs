use crate::export::ExportFormat;
use crate::testcase::{Priority, TestType};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Figma design to QA test case generator
#[derive(Parser, Debug)]
#[command(
    name = "figma-qa",
    about = "Generate QA test cases from Figma designs",
    version,
    author,
    long_about = "figma-qa reads a Figma design through the REST API, recognizes UI patterns \
                  and user flows from layer names and copy, and writes templated QA test \
                  cases to Excel, TestRail CSV, CSV or JSON. It can also run as an MCP \
                  server over stdio.\n\n\
                  Set FIGMA_TOKEN in the environment or in a .env file."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(
        short = 'v',
        long,
        global = true,
        help = "Verbose output: debug logs and generation statistics"
    )]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Generate test cases from a Figma link",
        long_about = "Fetches the design, analyzes it and writes the generated test cases.\n\n\
                      Examples:\n  \
                      figma-qa generate 'https://www.figma.com/design/abc123/App?node-id=1-2'\n  \
                      figma-qa generate <URL> -f testrail -o output/cases.csv\n  \
                      figma-qa generate <URL> -a basic --test-type security\n  \
                      figma-qa generate <URL> -p P2 --scenarios scenarios.json"
    )]
    Generate(GenerateArgs),

    #[command(
        about = "Analyze a Figma design without generating test cases",
        long_about = "Prints the detected UI patterns, structure, user flow and recommendations.\n\n\
                      Examples:\n  \
                      figma-qa analyze <URL>\n  \
                      figma-qa analyze <URL> --format json --no-screenshot"
    )]
    Analyze(AnalyzeArgs),

    #[command(
        about = "Compare an AS-IS screen with a TO-BE screen",
        long_about = "Analyzes both screens and reports pattern, complexity and flow changes \
                      with the regression tests they call for.\n\n\
                      Examples:\n  \
                      figma-qa compare <AS_IS_URL> <TO_BE_URL>"
    )]
    Compare(CompareArgs),

    #[command(
        about = "Run the five-step checklist pipeline",
        long_about = "Analysis, checklist, draft test cases, cross-validation and CSV/Excel \
                      export. Every step writes its JSON artifact to the output directory.\n\n\
                      Examples:\n  \
                      figma-qa pipeline <URL> --domain Account --feature Login\n  \
                      figma-qa pipeline <URL> --output-dir /tmp/qa"
    )]
    Pipeline(PipelineArgs),

    #[command(
        about = "List generated test cases missing from an existing suite",
        long_about = "Compares the cases generated for a design with an existing test case \
                      file (JSON array or a figma-qa JSON export).\n\n\
                      Examples:\n  \
                      figma-qa missing <URL> --existing output/testcases.json"
    )]
    Missing(MissingArgs),

    #[command(
        about = "Generate test cases from a feature scenario file",
        long_about = "Reads {\"feature_name\", \"priority\", \"scenarios\"} from a JSON file \
                      and writes one test case per scenario.\n\n\
                      Examples:\n  \
                      figma-qa scenarios feature.json -f json"
    )]
    Scenarios(ScenariosArgs),

    #[command(about = "Run as an MCP server on stdin/stdout")]
    Serve(ServeArgs),

    #[command(about = "Show the effective configuration")]
    Config(ConfigArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct GenerateArgs {
    #[arg(value_name = "FIGMA_URL", help = "Figma design link")]
    pub url: String,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help = "Output file (default: <output dir>/testcases.<ext>)"
    )]
    pub output: Option<PathBuf>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "excel",
        help = "Output file format"
    )]
    pub format: ExportFormatArg,

    #[arg(
        short = 'a',
        long,
        value_enum,
        default_value = "enhanced",
        help = "Analysis mode"
    )]
    pub analysis: AnalysisMode,

    #[arg(
        short = 'p',
        long,
        value_parser = parse_priority,
        help = "Keep only cases at or above this priority (P1..P4)"
    )]
    pub priority: Option<Priority>,

    #[arg(
        short = 't',
        long,
        value_parser = parse_test_type,
        help = "Test type for requirement-based cases in basic mode"
    )]
    pub test_type: Option<TestType>,

    #[arg(long, help = "Skip rendering the linked node")]
    pub no_screenshot: bool,

    #[arg(
        long,
        value_name = "FILE",
        help = "JSON array of custom scenarios to append"
    )]
    pub scenarios: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct AnalyzeArgs {
    #[arg(value_name = "FIGMA_URL", help = "Figma design link")]
    pub url: String,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,

    #[arg(
        short = 'a',
        long,
        value_enum,
        default_value = "enhanced",
        help = "Analysis mode"
    )]
    pub analysis: AnalysisMode,

    #[arg(long, help = "Skip rendering the linked node")]
    pub no_screenshot: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompareArgs {
    #[arg(value_name = "AS_IS_URL", help = "Current screen")]
    pub as_is: String,

    #[arg(value_name = "TO_BE_URL", help = "Redesigned screen")]
    pub to_be: String,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct PipelineArgs {
    #[arg(value_name = "FIGMA_URL", help = "Figma design link")]
    pub url: String,

    #[arg(long, default_value = "General", help = "Domain column value")]
    pub domain: String,

    #[arg(long, default_value = "Feature", help = "Section column value")]
    pub feature: String,

    #[arg(
        long,
        value_name = "DIR",
        help = "Directory for artifacts (default: configured output dir)"
    )]
    pub output_dir: Option<PathBuf>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct MissingArgs {
    #[arg(value_name = "FIGMA_URL", help = "Figma design link")]
    pub url: String,

    #[arg(long, value_name = "FILE", help = "Existing test cases (JSON)")]
    pub existing: PathBuf,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help = "Write the missing cases to this file"
    )]
    pub output: Option<PathBuf>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "excel",
        help = "Output file format"
    )]
    pub format: ExportFormatArg,

    #[arg(long, help = "Skip rendering the linked node")]
    pub no_screenshot: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct ScenariosArgs {
    #[arg(value_name = "FILE", help = "Feature scenario file (JSON)")]
    pub config: PathBuf,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help = "Output file (default: <output dir>/scenario_testcases.<ext>)"
    )]
    pub output: Option<PathBuf>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "excel",
        help = "Output file format"
    )]
    pub format: ExportFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct ServeArgs {
    #[arg(
        long,
        value_name = "DIR",
        help = "Directory for workbooks saved by tools (default: configured output dir)"
    )]
    pub output_dir: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct ConfigArgs {
    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormatArg {
    Excel,
    Testrail,
    Json,
    Csv,
}

impl From<ExportFormatArg> for ExportFormat {
    fn from(arg: ExportFormatArg) -> Self {
        match arg {
            ExportFormatArg::Excel => ExportFormat::Excel,
            ExportFormatArg::Testrail => ExportFormat::Testrail,
            ExportFormatArg::Json => ExportFormat::Json,
            ExportFormatArg::Csv => ExportFormat::Csv,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisMode {
    /// Requirement texts only
    Basic,
    /// Patterns, structure, flow and recommendations
    Enhanced,
}

fn parse_priority(s: &str) -> Result<Priority, String> {
    s.parse()
}

fn parse_test_type(s: &str) -> Result<TestType, String> {
    s.parse()
}
