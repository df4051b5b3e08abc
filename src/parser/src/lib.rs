use std::{
    fs::File,
    path::{Path, PathBuf},
    fmt::{self, Display, Formatter},
    ffi::OsStr,
};

use located_error::prelude::*;

use clap::{Parser, Subcommand, ArgEnum};
use serde::{Serialize, Deserialize};
use log::debug;

mod error;
pub use error::ParserError;

#[derive(Parser, Debug, Serialize, Deserialize)]
#[clap(name="heredity-rs", author, version, about, long_about = None)]
#[clap(propagate_version = true)]
/// heredity-rs: exact inference of gene and trait probabilities within a pedigree.
pub struct Cli {
    ///Set the verbosity level (-v -vv -vvv)
    ///
    /// Set the verbosity level of this program. Multiple levels allowed {n}
    ///
    /// -v: Info  |  -vv: Debug  | -vvv: Trace {n}
    ///
    /// Note that the program will still output warnings by default, even when this flag is off.
    /// Use The --quiet/-q to disable them
    #[clap(short='v', long, parse(from_occurrences), global=true)]
    pub verbose: u8,

    /// Disable warnings.
    ///
    /// By default, warnings are emmited and redirected to the console, even when verbose mode is off.
    /// Use this argument to disable this. Only errors will be displayed.
    #[clap(short='q', long, global=true)]
    pub quiet: bool,

    #[clap(subcommand)]
    pub commands: Commands,
}

impl Cli {
    /// Serialize command line arguments within a `.yaml` file.
    ///
    /// # Behavior
    /// - Arguments are always logged at the `debug` level.
    /// - If the user provided an `--output-dir`, arguments are also written within that directory,
    ///   following the naming convention '{current time}-{module name}.yaml', where the current time
    ///   follows the format `YYYY`-`MM`-`DD`T`hhmmss`. The path of the written file is then returned.
    ///
    /// # Errors
    /// - if `serde_yaml` fails to parse `Self` to a string.
    /// - if the output file cannot be written.
    pub fn serialize(&self) -> Result<Option<PathBuf>> {
        let serialized = serde_yaml::to_string(&self)
            .map_err(ParserError::Serialize)
            .loc("While serializing command line arguments")?;

        debug!("\n---- Command line args ----\n{}\n---", serialized);

        let output_dir = match &self.commands {
            Commands::Infer { infer } => match &infer.output_dir {
                Some(dir) => dir,
                None      => return Ok(None),
            },
            Commands::FromYaml { yaml: _ } | Commands::Tables => return Ok(None),
        };

        let current_time = chrono::offset::Local::now().format("%Y-%m-%dT%H%M%S").to_string();
        let output_file = output_dir.join(format!("{current_time}-infer.yaml"));
        std::fs::write(&output_file, serialized)
            .map_err(|e| ParserError::WriteArgs(output_file.display().to_string(), e))
            .loc("While serializing command line arguments")?;
        Ok(Some(output_file))
    }

    /// Deserialize a `.yaml` file into Command line arguments.
    ///
    /// # Errors
    /// - if the provided `.yaml` does not exist, or does not carry read permissions
    /// - if `serde_yaml` fails to parse the provided file to `Self`.
    pub fn deserialize(yaml: &Path) -> Result<Self> {
        let loc_msg = || format!("While attempting to deserialize arguments from {}", yaml.display());
        let file = File::open(yaml).with_loc(loc_msg)?;
        serde_yaml::from_reader(file)
            .map_err(|e| ParserError::Deserialize(yaml.display().to_string(), e))
            .with_loc(loc_msg)
    }

    /// Verbosity level used to initialize the logger. `--quiet` takes precedence over `-v`
    pub fn verbosity(&self) -> u8 {
        if self.quiet {0} else {self.verbose.saturating_add(1)}
    }
}

#[derive(Subcommand, Debug, Serialize, Deserialize)]
pub enum Commands {
    /// Compute the posterior gene and trait distributions of every individual within a pedigree.
    ///
    /// Exact inference by enumeration: every joint assignment of gene copies and trait
    /// presence is weighted, so that runtime grows as 8^n for n individuals.
    Infer {
        #[clap(flatten)]
        infer: Infer,
    },

    /// Run heredity-rs using a previously generated .yaml configuration file.
    ///
    /// This allows users to easily re-apply a heredity-rs command using the exact same parameters
    /// and arguments.
    FromYaml {
        yaml: PathBuf,
    },

    /// Print the default probability tables in YAML format.
    ///
    /// The output can be edited and provided back through `infer --tables`.
    Tables,
}

/// Output layout of the posterior distributions.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ArgEnum, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human readable, indented report.
    Report,
    /// Tab-separated table: one line per individual.
    Tsv,
}

impl Default for OutputFormat {
    fn default() -> Self {Self::Report}
}

impl OutputFormat {
    /// File extension of the output file when writing to an `--output-dir`
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Report => "posteriors",
            Self::Tsv    => "tsv",
        }
    }
}

/// Compute posterior probabilities within a pedigree.
#[derive(Parser, Debug, Default, Serialize, Deserialize)]
pub struct Infer {
    /// Input pedigree definition file.
    ///
    /// Comma-separated file, with header 'name,mother,father,trait'. Parents must either both be
    /// blank (founder) or both name other individuals of the file. trait must be '1' (present),
    /// '0' (absent) or left blank (unknown).
    #[clap(parse(try_from_os_str=valid_input_file))]
    pub data: PathBuf,

    /// Custom probability tables (YAML).
    ///
    /// Use `heredity-rs tables` to print the default tables, and use them as a template.
    #[clap(short='t', long, required(false), parse(try_from_os_str=valid_input_file))]
    pub tables: Option<PathBuf>,

    /// Override the probability that a transmitted gene copy mutates.
    ///
    /// Value must lie within [0, 1]. Takes precedence over the value of --tables.
    #[clap(short='m', long, required(false), parse(try_from_str=parse_probability))]
    pub mutation_rate: Option<f64>,

    /// Draw one-copy and two-copy gene sets as a proper partition of the pedigree.
    ///
    /// By default, one-copy and two-copy sets are enumerated independently: an individual may be
    /// found within both sets, in which case the one-copy assignment takes precedence, and
    /// one-copy outcomes are weighted more than once. This flag skips such overlapping
    /// combinations.
    #[clap(short='D', long)]
    pub disjoint_gene_sets: bool,

    /// Do not prune trait sets contradicting the observed traits.
    ///
    /// Pruned worlds always carry a null probability: disabling pruning does not change
    /// results, only runtime.
    #[clap(long)]
    pub no_pruning: bool,

    /// Number of worker threads.
    ///
    /// 1 runs inference sequentially. 0 lets the thread pool pick one thread per available core.
    #[clap(short='@', long, default_value("1"))]
    pub threads: usize,

    /// Output format.
    #[clap(short='f', long, arg_enum, default_value("report"))]
    pub format: OutputFormat,

    /// Output directory where results will be written.
    ///
    /// Results are printed to the standard output when this argument is absent. Note that
    /// heredity-rs will create the specified leaf directory if it is not present, but does not
    /// allow itself from creating parent directories.
    #[clap(short='o', long, required(false), parse(try_from_os_str=valid_output_dir))]
    pub output_dir: Option<PathBuf>,

    /// Overwrite existing output files.
    #[clap(short='w', long)]
    pub overwrite: bool,

    /// Display a progress bar during enumeration.
    #[clap(short='p', long)]
    pub progress: bool,
}

impl Infer {
    /// Return the path of the output file, if any: '{output_dir}/{data file stem}.{format extension}'
    ///
    /// # Errors
    /// - if the input pedigree file carries no file stem.
    /// - if the output file already exists and `--overwrite` was not requested.
    pub fn output_file(&self) -> Result<Option<PathBuf>> {
        let loc_msg = "While generating the output file name";
        let Some(output_dir) = &self.output_dir else {
            return Ok(None)
        };

        let stem = self.data.file_stem()
            .with_loc(|| ParserError::ParseOutputPrefix)
            .loc(loc_msg)?;

        let mut path = output_dir.join(stem);
        path.set_extension(self.format.extension());
        self.can_write_file(&path).loc(loc_msg)?;
        Ok(Some(path))
    }

    /// Check whether a file can be written, given the user's `--overwrite` preferences.
    pub fn can_write_file(&self, pathbuf: &Path) -> Result<bool> {
        if ! self.overwrite && pathbuf.exists() {
            return Err(ParserError::CannotOverwrite(pathbuf.display().to_string()))
                .loc( "While parsing command line arguments" )
        }
        Ok(true)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum FileEntity {File, Directory}

impl Display for FileEntity {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::File      => write!(f, "File"),
            Self::Directory => write!(f, "Directory"),
        }
    }
}

impl FileEntity {
    fn validate(self, path: &Path) -> Result<(), ParserError> {
        use ParserError::InvalidFileEntity;
        let valid = match self {
            Self::File      => path.is_file(),
            Self::Directory => path.is_dir()
        };

        if valid {
            Ok(())
        } else {
            Err(InvalidFileEntity(self, path.display().to_string()))
        }
    }
}

fn assert_filesystem_entity_is_valid(s: &OsStr, entity: FileEntity) -> Result<()> {
    use ParserError::MissingFileEntity;
    let path = Path::new(s);
    if ! path.exists() {
        return Err(MissingFileEntity(entity, path.display().to_string()))
            .loc("While parsing arguments.")
    }

    entity.validate(path).loc("While parsing arguments.")
}

fn valid_input_file(s: &OsStr) -> Result<PathBuf> {
    assert_filesystem_entity_is_valid(s, FileEntity::File)
        .loc("While checking for file validity")?;
    Ok(PathBuf::from(s))
}

fn valid_output_dir(s: &OsStr) -> Result<PathBuf> {
    if ! Path::new(s).exists() {
        std::fs::create_dir(s).with_loc(|| format!("While creating output directory {}", Path::new(s).display()))?;
    }
    assert_filesystem_entity_is_valid(s, FileEntity::Directory)
        .loc("While checking for directory validity")?;
    Ok(PathBuf::from(s))
}

/// Parse a user-provided probability, and ensure it lies within the [0, 1] range.
pub fn parse_probability(s: &str) -> Result<f64> {
    use ParserError::ParseProbability;
    const MIN_PROB: f64 = 0.0;
    const MAX_PROB: f64 = 1.0;

    let prob = s.parse::<f64>().with_loc(|| format!("While parsing {s}"))?;
    match (MIN_PROB..=MAX_PROB).contains(&prob) {
        true  => Ok(prob),
        false => Err(anyhow!(ParseProbability(MIN_PROB, MAX_PROB, prob))).with_loc(|| format!("While parsing {s}"))
    }
}
