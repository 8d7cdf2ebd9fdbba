use anyhow::Context;
use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;

use voc_inspect::annotation::print_tree;
use voc_inspect::config::DEFAULT_PROGRESS_INTERVAL;
use voc_inspect::{
    BndboxPolicy, ClassMap, DataType, DatasetConfig, DatasetLayout, LogSink, ScanPolicy, Visualizer,
    materialize_sample, read_filelist, read_pascal_voc, scan_labels,
};

#[derive(Parser)]
#[command(name = "voc_inspect")]
#[command(about = "Explore a Pascal VOC table-detection dataset")]
struct Cli {
    /// YAML config file (flags below override its values)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Dataset root holding images_filelist.txt and train/
    #[arg(long, value_name = "DIR", global = true)]
    dataset_root: Option<PathBuf>,

    #[arg(long, value_enum, global = true)]
    data_type: Option<DataType>,

    /// Local directory samples are copied into
    #[arg(long, value_name = "DIR", global = true)]
    work_dir: Option<PathBuf>,

    /// Directory for rendered images (default: <work-dir>/bbox)
    #[arg(long, value_name = "DIR", global = true)]
    output_dir: Option<PathBuf>,

    /// TTF/OTF font for drawing labels
    #[arg(long, value_name = "FILE", global = true)]
    font: Option<PathBuf>,

    #[arg(long, value_enum, global = true)]
    bndbox_policy: Option<BndboxPolicy>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Copy samples from the filelist locally and draw their boxes
    Samples {
        #[arg(long, default_value_t = 10)]
        count: usize,

        #[arg(long, default_value_t = 0)]
        offset: usize,
    },

    /// Scan every annotation and list the distinct labels
    Labels {
        /// Stop at the first malformed file instead of skipping it
        #[arg(long)]
        fail_fast: bool,

        /// Log progress every N files
        #[arg(long, value_name = "N", default_value_t = DEFAULT_PROGRESS_INTERVAL)]
        progress_every: usize,
    },

    /// Print the element tree of one annotation file
    Tree {
        #[arg(value_name = "XML")]
        path: PathBuf,
    },

    /// Print the class map for the data type
    Classes,
}

impl Cli {
    fn dataset_config(&self) -> anyhow::Result<DatasetConfig> {
        let mut config = match (&self.config, &self.dataset_root) {
            (Some(file), _) => DatasetConfig::from_yaml_file(file)?,
            (None, Some(root)) => DatasetConfig::new(root),
            (None, None) => anyhow::bail!("Either --config or --dataset-root is required"),
        };

        if let Some(root) = &self.dataset_root {
            config.dataset_root = root.clone();
        }
        if let Some(data_type) = self.data_type {
            config.data_type = data_type;
        }
        if let Some(work_dir) = &self.work_dir {
            config.work_dir = work_dir.clone();
        }
        if let Some(output_dir) = &self.output_dir {
            config.output_dir = Some(output_dir.clone());
        }
        if let Some(font) = &self.font {
            config.font_path = Some(font.clone());
        }
        if let Some(policy) = self.bndbox_policy {
            config.bndbox_policy = policy;
        }

        Ok(config)
    }

    fn data_type(&self) -> anyhow::Result<DataType> {
        if let Some(data_type) = self.data_type {
            return Ok(data_type);
        }
        match &self.config {
            Some(file) => Ok(DatasetConfig::from_yaml_file(file)?.data_type),
            None => Ok(DataType::default()),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    match &args.command {
        Command::Samples { count, offset } => {
            let config = args.dataset_config()?;
            run_samples(&config, *count, *offset)
        }
        Command::Labels { fail_fast, progress_every } => {
            let mut config = args.dataset_config()?;
            if *fail_fast {
                config.scan_policy = ScanPolicy::FailFast;
            }
            run_labels(&config, *progress_every)
        }
        Command::Tree { path } => {
            let mut stdout = std::io::stdout().lock();
            print_tree(path, &mut stdout)?;
            Ok(())
        }
        Command::Classes => {
            let data_type = args.data_type()?;
            for (label, id) in ClassMap::for_data_type(data_type).iter() {
                println!("{id}\t{label}");
            }
            Ok(())
        }
    }
}

fn run_samples(config: &DatasetConfig, count: usize, offset: usize) -> anyhow::Result<()> {
    let filelist = read_filelist(&DatasetLayout::new(&config.dataset_root))?;
    info!("Filelist has {} images", filelist.len());

    let visualizer = Visualizer::from_config(config)?;

    for relative in filelist.iter().skip(offset).take(count) {
        let sample = materialize_sample(config, relative)
            .with_context(|| format!("Failed to materialize {}", relative.display()))?;
        let annotation = read_pascal_voc(&sample.annotation, config.bndbox_policy)?;
        let (boxes, labels) = annotation.into_parts();

        let output = visualizer.draw(&sample.image, &boxes, &labels)?;
        println!("{} ({} objects) -> {}", relative.display(), boxes.len(), output.display());
    }

    Ok(())
}

fn run_labels(config: &DatasetConfig, progress_every: usize) -> anyhow::Result<()> {
    let mut sink = LogSink::new(progress_every);
    let report = scan_labels(config, &mut sink)?;

    println!("\n=== Labels ({} files scanned) ===", report.files_scanned);
    let class_map = ClassMap::for_data_type(config.data_type);
    for label in &report.labels {
        if class_map.contains(label) {
            println!("  {label}");
        } else {
            println!("  {label}  (not in {:?} class map)", config.data_type);
        }
    }

    if !report.sentinel_files.is_empty() {
        println!("\nFiles with '{}':", voc_inspect::scan::SENTINEL_LABEL);
        for path in &report.sentinel_files {
            println!("  {}", path.display());
        }
    }

    if !report.failures.is_empty() {
        println!("\nSkipped {} files:", report.failures.len());
        for failure in &report.failures {
            println!("  {}", failure.error);
        }
    }

    Ok(())
}
