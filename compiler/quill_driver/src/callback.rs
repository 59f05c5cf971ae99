//! Default diagnostic callback: colored rendering to stderr.

use std::io::{self, IsTerminal, Write};
use std::sync::Arc;

use quill_diagnostic::{render, ColorMode, Diagnostic, Level};

use crate::context::{Context, DiagnosticCallback};

/// Build the default diagnostic callback.
///
/// Renders each diagnostic to stderr: the `<Level|Code>` header, a source
/// snippet with a caret span when the diagnostic carries a location, and any
/// attached `<Info>` entries. Source contents are resolved through the
/// driver the callback is invoked with, so locations from any loaded file
/// render without extra plumbing.
pub fn default_diagnostic_callback(color: ColorMode) -> DiagnosticCallback {
    let colors_on = color.should_use_colors(io::stderr().is_terminal());

    Arc::new(move |context: &Context, diagnostic: &Diagnostic| {
        let mut out = io::stderr().lock();

        render::render_header(&mut out, diagnostic, colors_on);

        if let Some(location) = &diagnostic.location {
            if let Some(source) = context.try_source(location.source) {
                render::render_snippet(
                    &mut out,
                    &source.origin(),
                    source.data(),
                    diagnostic.level,
                    location,
                    colors_on,
                );
            }
        }

        for info in &diagnostic.infos {
            render::render_info(&mut out, &info.message, colors_on);
            if let Some(location) = &info.location {
                if let Some(source) = context.try_source(location.source) {
                    render::render_snippet(
                        &mut out,
                        &source.origin(),
                        source.data(),
                        Level::Info,
                        location,
                        colors_on,
                    );
                }
            }
        }

        let _ = out.flush();
    })
}
