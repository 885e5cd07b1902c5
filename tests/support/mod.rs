pub mod renderer;
pub mod value;

use mustache_core::{compile, process, CompileOptions, Template};

use self::renderer::StringRenderer;
use self::value::JsonProvider;

/// Compiles `template`, panicking with every collected diagnostic on failure.
///
/// Test-only convenience: production callers decide for themselves how to
/// surface `Vec<ParseError>`.
pub fn compile_ok(template: &str) -> Template {
    compile(template, CompileOptions::default())
        .unwrap_or_else(|errors| panic!("template failed to compile: {errors:?}"))
}

/// Compiles and renders `template` against a JSON-ish tree parsed from
/// `data`, with no partials available.
pub fn render(template: &str, data: &str) -> String {
    render_with_partials(template, data, &[])
}

/// As [`render`], but `partials` supplies `(name, template_text)` pairs
/// available to `{{>name}}` tags.
pub fn render_with_partials(template: &str, data: &str, partials: &[(&str, &str)]) -> String {
    let t = compile_ok(template);

    let mut provider = JsonProvider::parse(data);
    for &(name, text) in partials {
        provider = provider.with_partial(name, compile_ok(text));
    }

    let mut renderer = StringRenderer::new();
    process(&t, &mut provider, &mut renderer).expect("processing should not be aborted by these test callbacks");
    renderer.into_string()
}
