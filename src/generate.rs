//! The generation pipeline: options in, a bundle of files out.
//!
//! Everything is computed in memory first so a bad option never leaves a
//! half-written destination behind. [`Bundle::write_to`] then lays the files
//! out as
//!
//! ```text
//! <dest>/*.v            synthesizable modules
//! <dest>/tb/*.v         testbenches and the simulation top
//! <dest>/tb/data/*.mif  stimulus and expected results
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use crate::config::{AdderMode, Options, Representation};
use crate::error::{Error, Result};
use crate::hdl::testbench::{AlaghiTreeTb, DotProductSim, DotProductTb, MatrixMultTb, NadderTb, DATA_DIR};
use crate::hdl::units::{
    Counter, DotProduct, DsConverter, LfsrModule, MatrixMult, Multiplier, SdConverter, Sng,
};
use crate::hdl::{self, create_adder_units, EmitContext, HdlUnit, ModuleNames};
use crate::plan::TreePlan;
use crate::stimulus::{AdderTreeData, DataFile, DotProductData, MatrixMultData};

/// Directory for testbenches, relative to the destination.
pub const TB_DIR: &str = "tb";

/// One output file, path relative to the destination directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub contents: String,
}

impl GeneratedFile {
    pub fn module(unit: &dyn HdlUnit, ctx: &EmitContext) -> Self {
        Self {
            path: PathBuf::from(hdl::file_name(unit, &ctx.names)),
            contents: hdl::render(unit, ctx),
        }
    }

    pub fn testbench(unit: &dyn HdlUnit, ctx: &EmitContext) -> Self {
        Self {
            path: Path::new(TB_DIR).join(hdl::file_name(unit, &ctx.names)),
            contents: hdl::render(unit, ctx),
        }
    }

    pub fn data(file: DataFile) -> Self {
        Self {
            path: Path::new(TB_DIR).join(DATA_DIR).join(file.name),
            contents: file.contents,
        }
    }
}

/// All files for one configuration.
#[derive(Debug, Clone, Default)]
pub struct Bundle {
    files: Vec<GeneratedFile>,
    seed: Option<u64>,
}

impl Bundle {
    pub fn files(&self) -> &[GeneratedFile] {
        &self.files
    }

    /// Look a file up by its relative path.
    pub fn get(&self, path: impl AsRef<Path>) -> Option<&GeneratedFile> {
        let path = path.as_ref();
        self.files.iter().find(|f| f.path == path)
    }

    /// Seed the stimulus was drawn from, if any stimulus was generated.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    fn push(&mut self, file: GeneratedFile) {
        debug!(path = %file.path.display(), bytes = file.contents.len(), "generated");
        self.files.push(file);
    }

    /// Write every file below `dest`, creating directories as needed.
    /// Returns the written paths.
    pub fn write_to(&self, dest: &Path) -> Result<Vec<PathBuf>> {
        if dest.exists() && !dest.is_dir() {
            return Err(Error::NotADirectory(dest.to_path_buf()));
        }
        create_dir(dest)?;

        let mut written = Vec::with_capacity(self.files.len());
        for file in &self.files {
            let path = dest.join(&file.path);
            if let Some(parent) = path.parent() {
                create_dir(parent)?;
            }
            fs::write(&path, &file.contents).map_err(|source| Error::Io {
                action: "write",
                path: path.clone(),
                source,
            })?;
            info!(path = %path.display(), "wrote");
            written.push(path);
        }
        Ok(written)
    }
}

fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|source| Error::Io {
        action: "create directory",
        path: path.to_path_buf(),
        source,
    })
}

/// Compute all files for `options`. `created` stamps every banner.
pub fn generate(options: &Options, created: DateTime<Utc>) -> Result<Bundle> {
    let ctx = EmitContext::new(ModuleNames::new(options.suffix.as_deref()), created);
    let (m, n, o) = (options.batch, options.input, options.output);
    let rep = options.representation;
    let adder = options.adder;

    let plan = TreePlan::new(n)?;
    info!(
        batch = m,
        input = n,
        output = o,
        ?rep,
        ?adder,
        tree_depth = plan.depth(),
        "generating"
    );

    let mut bundle = Bundle::default();

    // ── Modules ──
    let dot_product = DotProduct::new(n, rep, adder);
    let mut modules: Vec<Box<dyn HdlUnit>> = vec![Box::new(Multiplier::new(rep))];
    modules.extend(create_adder_units(adder, n));
    modules.push(Box::new(dot_product.valid_register()));
    modules.push(Box::new(dot_product));
    modules.push(Box::new(MatrixMult::new(m, n, o, adder)));
    for unit in &modules {
        bundle.push(GeneratedFile::module(unit.as_ref(), &ctx));
    }

    let simulate = match &options.simulation {
        Some(_) if rep == Representation::Bi => {
            warn!("the simulation top models unipolar streams only, skipping it");
            None
        }
        other => other.as_ref(),
    };
    if options.testbench.is_none() && simulate.is_none() {
        return Ok(bundle);
    }

    let seed = options
        .testbench
        .as_ref()
        .and_then(|tb| tb.seed)
        .unwrap_or_else(rand::random);
    info!(seed, "stimulus seed");
    bundle.seed = Some(seed);
    let mut rng = StdRng::seed_from_u64(seed);

    // ── Testbenches and stimulus ──
    if let Some(tb) = &options.testbench {
        let length = tb.length;
        match adder {
            AdderMode::Selector => {
                bundle.push(GeneratedFile::testbench(&NadderTb::new(n), &ctx));
            }
            AdderMode::Alaghi => {
                bundle.push(GeneratedFile::testbench(&AlaghiTreeTb::new(n, length), &ctx));
                let data = AdderTreeData::generate(n, length, &mut rng)?;
                data.files().into_iter().for_each(|f| bundle.push(GeneratedFile::data(f)));
            }
        }

        bundle.push(GeneratedFile::testbench(&DotProductTb::new(n, adder, length), &ctx));
        let data = DotProductData::generate(n, rep, adder, length, &mut rng)?;
        data.files().into_iter().for_each(|f| bundle.push(GeneratedFile::data(f)));

        bundle.push(GeneratedFile::testbench(&MatrixMultTb::new(m, n, o, adder, length), &ctx));
        let data = MatrixMultData::generate(m, n, o, rep, adder, length, &mut rng)?;
        data.files().into_iter().for_each(|f| bundle.push(GeneratedFile::data(f)));
    }

    // ── Simulation ──
    if let Some(sim) = simulate {
        let p = sim.precision;
        let mut units: Vec<Box<dyn HdlUnit>> = vec![Box::new(LfsrModule::new(p))];
        if adder == AdderMode::Selector {
            units.push(Box::new(Counter::new(n - 1)));
        }
        units.push(Box::new(DsConverter::new(p)));
        units.push(Box::new(Sng::new(p)));
        units.push(Box::new(SdConverter::new(p)));
        for unit in &units {
            bundle.push(GeneratedFile::module(unit.as_ref(), &ctx));
        }

        let top = DotProductSim::random(n, p, adder, &mut rng);
        info!(expected = %top.expected(), "simulation top");
        bundle.push(GeneratedFile::testbench(&top, &ctx));
    }

    Ok(bundle)
}
