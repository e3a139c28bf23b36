//! Instruction shortcut emission
//!
//! Produces the block that replaces the instruction-shortcuts region of a
//! driver template. The block carries its own begin/end markers, so a
//! generated driver can be fed back in as a template.

use crate::alias::{AliasGroup, AliasTable, Instruction};

use super::common::{join_ints, CodeGenOptions, IndentWriter};
use super::{Dispatch, DEFAULT_RUN_TIME_PARAM};

pub const SHORTCUTS_BEGIN: &str = "// BEGIN instruction shortcuts";
pub const SHORTCUTS_END: &str = "// END instruction shortcuts";

/// Suffix of a group's dense map constant.
const MAP_SUFFIX: &str = "_instruction_map";

/// Local holding the computed dense map offset.
const OFFSET_VAR: &str = "i";

/// Emits accessor methods for an [`AliasTable`].
pub struct ShortcutGenerator<D: Dispatch> {
    dispatch: D,
    options: CodeGenOptions,
    run_time_param: String,
}

impl<D: Dispatch> ShortcutGenerator<D> {
    pub fn new(dispatch: D) -> Self {
        Self {
            dispatch,
            options: CodeGenOptions::default(),
            run_time_param: DEFAULT_RUN_TIME_PARAM.to_string(),
        }
    }

    pub fn with_options(mut self, options: CodeGenOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_run_time_param(mut self, name: impl Into<String>) -> Self {
        self.run_time_param = name.into();
        self
    }

    /// Full replacement for the instruction-shortcuts region, markers
    /// included.
    pub fn generate(&self, table: &AliasTable) -> String {
        let mut w = IndentWriter::with_options(self.options.clone());
        w.write_raw(SHORTCUTS_BEGIN);
        w.newline();
        w.write_raw(&self.generate_body(table));
        w.write_raw(SHORTCUTS_END);
        w.into_output()
    }

    /// Accessors only: per-instruction accessors in index order, then
    /// every group's map and parameterized accessors.
    pub fn generate_body(&self, table: &AliasTable) -> String {
        let mut w = IndentWriter::with_options(self.options.clone());
        for _ in 0..self.options.member_indent {
            w.indent();
        }

        for instruction in &table.instructions {
            self.emit_instruction(&mut w, instruction);
        }
        for group in &table.groups {
            self.emit_group(&mut w, group);
        }

        w.into_output()
    }

    fn emit_instruction(&self, w: &mut IndentWriter, instruction: &Instruction) {
        let index = instruction.index.to_string();

        w.newline();
        w.write_block(
            &format!("public static void {}() {{", instruction.name),
            "}",
            |w| w.writeln(&self.dispatch.invoke(&index)),
        );
        w.newline();
        w.write_block(
            &format!(
                "public static void {}(int {}) {{",
                instruction.name, self.run_time_param
            ),
            "}",
            |w| {
                w.writeln(
                    &self
                        .dispatch
                        .invoke_timed(&index, &self.run_time_param),
                )
            },
        );
    }

    fn emit_group(&self, w: &mut IndentWriter, alias: &AliasGroup) {
        let base = &alias.group.base_name;
        let map_name = format!("{}{}", base, MAP_SUFFIX);
        let params: Vec<String> = (0..alias.group.arity()).map(|i| format!("p{}", i)).collect();
        let param_list = params
            .iter()
            .map(|p| format!("int {}", p))
            .collect::<Vec<_>>()
            .join(", ");
        let offset = format!(
            "int {} = {};",
            OFFSET_VAR,
            params
                .iter()
                .zip(alias.map.strides())
                .map(|(p, s)| format!("{}*{}", p, s))
                .collect::<Vec<_>>()
                .join("+")
        );
        let lookup = format!("{}[{}]", map_name, OFFSET_VAR);

        w.newline();
        w.write_comment(&format!("// {}: shape {:?}", base, alias.map.shape()));
        w.writeln(&format!(
            "public static final int[] {} = {{{}}};",
            map_name,
            join_ints(alias.map.cells().iter().copied())
        ));

        w.newline();
        w.write_block(
            &format!("public static void {}({}) {{", base, param_list),
            "}",
            |w| {
                w.writeln(&offset);
                w.writeln(&self.dispatch.invoke(&lookup));
            },
        );
        w.newline();
        w.write_block(
            &format!(
                "public static void {}({}, int {}) {{",
                base, param_list, self.run_time_param
            ),
            "}",
            |w| {
                w.writeln(&offset);
                w.writeln(
                    &self
                        .dispatch
                        .invoke_timed(&lookup, &self.run_time_param),
                );
            },
        );
    }
}
