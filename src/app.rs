//! Application Generation
//!
//! Builds a complete application from a template set and a device data
//! file. Generation is split into two phases:
//!
//! 1. **stage**: read every input, generate the instruction shortcuts and
//!    patch every module in memory. Any missing input, malformed data file
//!    or missing anchor fails here, before anything touches the disk.
//! 2. **commit**: write all staged files.

use std::fs;
use std::path::PathBuf;

use thiserror::Error;

use crate::alias::{AliasTable, Diagnostic};
use crate::codegen::{NamedDispatch, ShortcutGenerator};
use crate::config::FlowgenConfig;
use crate::datafile::{DataFileError, DeviceData};
use crate::template::{rename_prefix, Anchor, PatchError, TemplatePatch};

/// Module holding the runtime driver and the instruction shortcuts.
pub const DRIVER_MODULE: &str = "Driver";

/// Module holding the chip image and port locations.
pub const GUI_MODULE: &str = "GUI";

#[derive(Debug, Error)]
pub enum MakeError {
    #[error("Input files do not exist: {}", display_paths(.0))]
    MissingInput(Vec<PathBuf>),

    #[error("Failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    DataFile(#[from] DataFileError),

    #[error(transparent)]
    Patch(#[from] PatchError),
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type for application generation.
pub type MakeResult<T> = Result<T, MakeError>;

/// The application to generate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSpec {
    /// Prefix of generated files and identifiers
    pub app_prefix: String,
    /// Chip image exported by the design tool
    pub image: PathBuf,
    /// Device data file exported by the design tool
    pub data: PathBuf,
}

impl AppSpec {
    /// Inputs default to `<App>.png` and `<App>.dat`.
    pub fn new(app_prefix: impl Into<String>) -> Self {
        let app_prefix = app_prefix.into();
        Self {
            image: PathBuf::from(format!("{}.png", app_prefix)),
            data: PathBuf::from(format!("{}.dat", app_prefix)),
            app_prefix,
        }
    }

    pub fn with_inputs(mut self, image: impl Into<PathBuf>, data: impl Into<PathBuf>) -> Self {
        self.image = image.into();
        self.data = data.into();
        self
    }

    /// Image name written into the GUI module.
    pub fn image_name(&self) -> String {
        self.image
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.image.display().to_string())
    }
}

/// A generated file held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    pub module: String,
    pub path: PathBuf,
    pub contents: String,
}

/// All outputs of one run, validated and ready to be written.
#[derive(Debug, Clone)]
pub struct StagedApp {
    files: Vec<StagedFile>,
    table: AliasTable,
}

impl StagedApp {
    pub fn files(&self) -> &[StagedFile] {
        &self.files
    }

    pub fn file(&self, module: &str) -> Option<&StagedFile> {
        self.files.iter().find(|f| f.module == module)
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.table
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.table.diagnostics
    }

    /// Write every staged file, overwriting existing ones.
    pub fn commit(&self) -> MakeResult<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(self.files.len());
        for file in &self.files {
            if let Some(parent) = file.path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).map_err(|source| MakeError::Io {
                        path: parent.to_path_buf(),
                        source,
                    })?;
                }
            }
            fs::write(&file.path, &file.contents).map_err(|source| MakeError::Io {
                path: file.path.clone(),
                source,
            })?;
            tracing::info!(path = %file.path.display(), bytes = file.contents.len(), "wrote");
            written.push(file.path.clone());
        }
        Ok(written)
    }
}

/// Generates applications according to a [`FlowgenConfig`].
#[derive(Debug, Clone, Default)]
pub struct AppGenerator {
    config: FlowgenConfig,
}

impl AppGenerator {
    pub fn new(config: FlowgenConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FlowgenConfig {
        &self.config
    }

    pub fn template_path(&self, module: &str) -> PathBuf {
        let t = &self.config.template;
        t.dir.join(format!("{}{}{}", t.prefix, module, t.extension))
    }

    pub fn output_path(&self, app_prefix: &str, module: &str) -> PathBuf {
        self.config.output.dir.join(format!(
            "{}{}{}",
            app_prefix, module, self.config.template.extension
        ))
    }

    /// Instruction shortcuts region for an alias table, markers included.
    pub fn shortcuts(&self, table: &AliasTable) -> String {
        ShortcutGenerator::new(NamedDispatch::new(self.config.dispatch.function.as_str()))
            .with_options(self.config.codegen_options())
            .with_run_time_param(self.config.dispatch.run_time_param.as_str())
            .generate(table)
    }

    /// Read, generate and patch everything in memory.
    pub fn stage(&self, app: &AppSpec) -> MakeResult<StagedApp> {
        let missing: Vec<PathBuf> = [&app.image, &app.data]
            .into_iter()
            .filter(|p| !p.exists())
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(MakeError::MissingInput(missing));
        }

        let data = DeviceData::load(&app.data)?;
        tracing::info!(
            data = %app.data.display(),
            instructions = data.instruction_names.len(),
            control_lines = data.control_lines,
            "read device data"
        );

        let table = AliasTable::from_names(&data.instruction_names);
        let shortcuts = self.shortcuts(&table);

        let mut files = Vec::with_capacity(self.config.template.modules.len());
        for module in &self.config.template.modules {
            let template_path = self.template_path(module);
            let text = fs::read_to_string(&template_path).map_err(|source| MakeError::Io {
                path: template_path.clone(),
                source,
            })?;

            let contents = self.patch_module(
                module,
                &template_path.display().to_string(),
                &text,
                app,
                &data,
                &shortcuts,
            )?;
            tracing::debug!(module = module.as_str(), "staged module");

            files.push(StagedFile {
                module: module.clone(),
                path: self.output_path(&app.app_prefix, module),
                contents,
            });
        }

        Ok(StagedApp { files, table })
    }

    /// Stage then commit.
    pub fn make(&self, app: &AppSpec) -> MakeResult<Vec<PathBuf>> {
        self.stage(app)?.commit()
    }

    fn patch_module(
        &self,
        module: &str,
        file: &str,
        text: &str,
        app: &AppSpec,
        data: &DeviceData,
        shortcuts: &str,
    ) -> MakeResult<String> {
        let renamed = rename_prefix(text, &self.config.template.prefix, &app.app_prefix);
        let patch = match module {
            DRIVER_MODULE => driver_patch(data, shortcuts),
            GUI_MODULE => gui_patch(data, &app.image_name()),
            _ => return Ok(renamed),
        };
        Ok(patch.apply(file, &renamed)?)
    }
}

/// Required substitutions for the driver module.
pub fn driver_patch(data: &DeviceData, shortcuts: &str) -> TemplatePatch {
    TemplatePatch::new()
        .set(
            Anchor::integer("CONTROL_LINES", "int CONTROL_LINES = "),
            data.control_lines.to_string(),
        )
        .set(
            Anchor::integer("INSTRUCTIONS", "int INSTRUCTIONS = "),
            data.instruction_count.to_string(),
        )
        .set(Anchor::comment_region("instructions"), data.instructions.as_str())
        .set(Anchor::comment_region("instruction shortcuts"), shortcuts)
        .set(
            Anchor::comment_region("instruction pumps"),
            data.pumps_replacement(),
        )
}

/// Required substitutions for the GUI module.
pub fn gui_patch(data: &DeviceData, image_name: &str) -> TemplatePatch {
    TemplatePatch::new()
        .set(
            Anchor::integer("IMAGE_WIDTH", "int IMAGE_WIDTH = "),
            data.image_width.to_string(),
        )
        .set(
            Anchor::integer("IMAGE_HEIGHT", "int IMAGE_HEIGHT = "),
            data.image_height.to_string(),
        )
        .set(
            Anchor::comment_region("port locations"),
            data.port_locations.as_str(),
        )
        .set(
            Anchor::quoted_png("IMAGE_FILENAME", "IMAGE_FILENAME = "),
            image_name,
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATA: &str = "\
{Width=640, Height=480}
number of control lines: 8
number of instructions: 1
// BEGIN port locations
{ {1, 2} },
// END port locations
// BEGIN instructions
{true},
// Flush
{},
{},
// END instructions
";

    #[test]
    fn test_app_spec_defaults() {
        let app = AppSpec::new("Chip");
        assert_eq!(app.image, PathBuf::from("Chip.png"));
        assert_eq!(app.data, PathBuf::from("Chip.dat"));

        let app = app.with_inputs("img/board.png", "board.dat");
        assert_eq!(app.image_name(), "board.png");
    }

    #[test]
    fn test_paths_follow_config() {
        let mut config = FlowgenConfig::default();
        config.template.dir = PathBuf::from("tpl");
        config.output.dir = PathBuf::from("out");
        let generator = AppGenerator::new(config);

        assert_eq!(
            generator.template_path("GUI"),
            PathBuf::from("tpl/TemplateGUI.java")
        );
        assert_eq!(
            generator.output_path("Chip", "GUI"),
            PathBuf::from("out/ChipGUI.java")
        );
    }

    #[test]
    fn test_gui_patch() {
        let data = DeviceData::parse(DATA).unwrap();
        let text = "\
String IMAGE_FILENAME = \"template.png\";
int IMAGE_WIDTH = 756;
int IMAGE_HEIGHT = 771;
\t// BEGIN port locations
\t{ {0, 0} },
\t// END port locations
";
        let out = gui_patch(&data, "chip.png").apply("GUI", text).unwrap();
        assert_eq!(
            out,
            "\
String IMAGE_FILENAME = \"chip.png\";
int IMAGE_WIDTH = 640;
int IMAGE_HEIGHT = 480;
\t// BEGIN port locations
{ {1, 2} },
// END port locations
"
        );
    }

    #[test]
    fn test_driver_patch_synthesizes_pumps() {
        let data = DeviceData::parse(DATA).unwrap();
        let text = "\
int CONTROL_LINES = 16;
int INSTRUCTIONS = 0;
{
// BEGIN instructions
// END instructions
};
{
// BEGIN instruction pumps
// END instruction pumps
};
// BEGIN instruction shortcuts
// END instruction shortcuts
";
        let out = driver_patch(&data, "SHORTCUTS").apply("Driver", text).unwrap();
        assert!(out.starts_with("int CONTROL_LINES = 8;\nint INSTRUCTIONS = 1;\n"));
        assert!(out.contains("{\nnull\n};"));
        assert!(out.contains("// Flush"));
        assert!(out.ends_with("SHORTCUTS\n"));
    }

    #[test]
    fn test_other_modules_are_only_renamed() {
        let generator = AppGenerator::default();
        let data = DeviceData::parse(DATA).unwrap();
        let app = AppSpec::new("Chip");
        let out = generator
            .patch_module("Main", "TemplateMain.java", "class TemplateMain {}", &app, &data, "")
            .unwrap();
        assert_eq!(out, "class ChipMain {}");
    }
}
