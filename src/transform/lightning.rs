//! Shared lightningcss parse/compile/print round trip

use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};
use lightningcss::targets::Targets;

pub(crate) fn parser_options<'i>(error_recovery: bool) -> ParserOptions<'i> {
    ParserOptions {
        error_recovery,
        ..ParserOptions::default()
    }
}

/// Parse `css`, run lightningcss' compatibility handlers for `targets`, print
pub(crate) fn compile(
    css: &str,
    targets: Targets,
    error_recovery: bool,
    minify_output: bool,
) -> anyhow::Result<String> {
    let mut stylesheet = StyleSheet::parse(css, parser_options(error_recovery))
        .map_err(|e| anyhow::anyhow!("CSS parse error: {e}"))?;

    stylesheet
        .minify(MinifyOptions {
            targets: targets.clone(),
            ..MinifyOptions::default()
        })
        .map_err(|e| anyhow::anyhow!("CSS compile error: {e}"))?;

    let result = stylesheet
        .to_css(PrinterOptions {
            minify: minify_output,
            targets,
            ..PrinterOptions::default()
        })
        .map_err(|e| anyhow::anyhow!("CSS print error: {e}"))?;

    Ok(result.code)
}
