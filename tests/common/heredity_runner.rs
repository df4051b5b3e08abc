use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use parser::{Cli, OutputFormat};

use super::Fixture;

/// Name of the output directory, within its temporary directory.
const OUTPUT_DIR: &str = "heredity-test-output";

/// Build a `heredity-rs infer` command line, on fixture files.
#[derive(Default)]
pub struct HeredityRunnerBuilder {
    data         : Option<Fixture>,
    tables       : Option<Fixture>,
    mutation_rate: Option<f64>,
    disjoint     : bool,
    no_pruning   : bool,
    threads      : Option<usize>,
    format       : Option<OutputFormat>,
    overwrite    : bool,
}

impl HeredityRunnerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pedigree definition file, relative to `tests/test-data`
    pub fn set_data(mut self, relative_path: &str) -> Self {
        self.data = Some(Fixture::copy(relative_path));
        self
    }

    /// Probability tables file, relative to `tests/test-data`
    pub fn set_tables(mut self, relative_path: &str) -> Self {
        self.tables = Some(Fixture::copy(relative_path));
        self
    }

    pub fn set_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = Some(rate);
        self
    }

    pub fn disjoint_gene_sets(mut self) -> Self {
        self.disjoint = true;
        self
    }

    pub fn no_pruning(mut self) -> Self {
        self.no_pruning = true;
        self
    }

    pub fn set_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    pub fn set_format(mut self, format: OutputFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn overwrite(mut self) -> Self {
        self.overwrite = true;
        self
    }

    pub fn build(self) -> Result<HeredityRunner> {
        let data = self.data.ok_or_else(|| anyhow::anyhow!("Missing pedigree definition file"))?;
        let output_dir = Fixture::blank(OUTPUT_DIR);
        let format = self.format.unwrap_or_default();

        let mut args = format!("heredity-rs infer {data} --output-dir {output_dir} --format {}", match format {
            OutputFormat::Report => "report",
            OutputFormat::Tsv    => "tsv",
        });
        if let Some(tables) = &self.tables {
            args.push_str(&format!(" --tables {tables}"));
        }
        if let Some(rate) = self.mutation_rate {
            args.push_str(&format!(" --mutation-rate {rate}"));
        }
        if let Some(threads) = self.threads {
            args.push_str(&format!(" --threads {threads}"));
        }
        for (flag, set) in [("--disjoint-gene-sets", self.disjoint), ("--no-pruning", self.no_pruning), ("--overwrite", self.overwrite)] {
            if set {
                args.push(' ');
                args.push_str(flag);
            }
        }

        let stem = data.file_stem().and_then(|stem| stem.to_str()).unwrap_or_default().to_string();
        let output_file = output_dir.join(format!("{stem}.{}", format.extension()));
        Ok(HeredityRunner{args, output_file, _data: data, _tables: self.tables, output_dir})
    }
}

/// A ready to run `heredity-rs infer` invocation. Fixtures are kept alive until the runner is dropped.
pub struct HeredityRunner {
    args       : String,
    output_file: PathBuf,
    output_dir : Fixture,
    _data      : Fixture,
    _tables    : Option<Fixture>,
}

impl HeredityRunner {
    pub fn cli(&self) -> Result<Cli> {
        Ok(Cli::try_parse_from(self.args.split_whitespace())?)
    }

    pub fn run(&self) -> Result<()> {
        heredity_rs::run(self.cli()?)
    }

    pub fn output_file(&self) -> &PathBuf {
        &self.output_file
    }

    pub fn output_dir(&self) -> &Fixture {
        &self.output_dir
    }
}
