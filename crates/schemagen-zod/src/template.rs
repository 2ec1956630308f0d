use minijinja::Environment;
use schemagen_core::GeneratorError;

/// Render a single template with `ctx`.
pub fn render(name: &str, source: &str, ctx: minijinja::Value) -> Result<String, GeneratorError> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_keep_trailing_newline(true);
    env.add_template(name, source).map_err(render_error)?;
    env.get_template(name)
        .and_then(|tmpl| tmpl.render(ctx))
        .map_err(render_error)
}

fn render_error(err: minijinja::Error) -> GeneratorError {
    GeneratorError::Render(err.to_string())
}
