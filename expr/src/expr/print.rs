//! Str, TeX and structural representations.
//!
//! - str form (`Display`): kind renderer if declared, else `Name(args, key=value)`;
//!   singletons print as their bare name
//! - TeX form: kind renderer if declared, else `{\rm Name}\left(args\right)`
//! - structural repr (`srepr`): restates the construction, e.g.
//!   `Flat(1, 2, 'a', key=3)`; the indented variant puts one argument per line
//!
//! Forms rendered with [`PrintConfig::global`] are cached on the node.

use std::fmt;

use crate::config::PrintConfig;
use crate::expr::Expr;
use crate::expr::cached_property::{CachedProperty, cached_property};
use crate::value::Value;

cached_property! {
    /// Cached str form under the global config.
    DisplayForm: String {
        cache_field: str_cache,
        compute: |expr| expr.render(PrintConfig::global())
    }
}

cached_property! {
    /// Cached TeX form under the global config.
    TexForm: String {
        cache_field: tex_cache,
        compute: |expr| expr.render_tex(PrintConfig::global())
    }
}

cached_property! {
    SReprForm: String {
        cache_field: srepr_cache,
        compute: |expr| {
            let args = expr.args().iter().map(Value::srepr);
            let kwargs = expr.kwargs().iter().map(|(k, v)| format!("{k}={}", v.srepr()));
            call_form(expr, args.chain(kwargs))
        }
    }
}

fn call_form(expr: &Expr, parts: impl Iterator<Item = String>) -> String {
    if expr.is_singleton() {
        return expr.kind().name().to_string();
    }
    format!("{}({})", expr.kind().name(), parts.collect::<Vec<_>>().join(", "))
}

fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
}

fn complex_form(re: f64, im: f64) -> String {
    if im.is_sign_negative() { format!("({re:?}-{:?}j)", -im) } else { format!("({re:?}+{im:?}j)") }
}

fn tuple_form(items: &[Value], each: impl Fn(&Value) -> String) -> String {
    match items {
        [single] => format!("({},)", each(single)),
        _ => format!("({})", items.iter().map(each).collect::<Vec<_>>().join(", ")),
    }
}

impl Expr {
    /// Str form under an explicit config (uncached unless `config` is the global one).
    pub fn render(&self, config: &PrintConfig) -> String {
        if let Some(render) = self.kind().render_str_fn() {
            return render(self, config);
        }
        let args = self.args().iter().map(|a| a.render(config));
        let kwargs = self.kwargs().iter().map(|(k, v)| format!("{k}={}", v.render(config)));
        call_form(self, args.chain(kwargs))
    }

    /// TeX form under an explicit config.
    pub fn render_tex(&self, config: &PrintConfig) -> String {
        if let Some(render) = self.kind().render_tex_fn() {
            return render(self, config);
        }
        let name = format!("{{\\rm {}}}", self.kind().name());
        if self.is_singleton() {
            return name;
        }
        let args: Vec<String> = self.args().iter().map(|a| a.render_tex(config)).collect();
        format!("{name}\\left({}\\right)", args.join(", "))
    }

    pub fn tex(&self) -> &str {
        TexForm::get(self)
    }

    /// Structural repr, e.g. `Flat(1, 2, 'a')`.
    pub fn srepr(&self) -> &str {
        SReprForm::get(self)
    }

    /// Multi-line structural repr indented by the global config.
    pub fn srepr_indented(&self) -> String {
        self.srepr_indented_with(PrintConfig::global())
    }

    pub fn srepr_indented_with(&self, config: &PrintConfig) -> String {
        indented(&Value::Expr(self.clone()), 0, config)
    }
}

fn indented(value: &Value, level: usize, config: &PrintConfig) -> String {
    let indent = " ".repeat(level * config.indent);
    let expr = match value {
        Value::Expr(e) if !e.is_singleton() => e,
        _ => return format!("{indent}{}", value.srepr()),
    };

    let mut lines = vec![format!("{indent}{}(", expr.kind().name())];
    for arg in expr.args() {
        lines.push(format!("{},", indented(arg, level + 1, config)));
    }
    let inner = " ".repeat((level + 1) * config.indent);
    for (key, val) in expr.kwargs() {
        lines.push(format!("{inner}{key}={},", val.srepr()));
    }
    if lines.len() > 1
        && let Some(last) = lines.last_mut()
    {
        last.pop();
    }
    if let Some(last) = lines.last_mut() {
        last.push(')');
    }
    lines.join("\n")
}

impl Value {
    /// Str form under an explicit config.
    pub fn render(&self, config: &PrintConfig) -> String {
        match self {
            Value::Int(i) => i.to_string(),
            Value::Float(f) => format!("{f:?}"),
            Value::Complex { re, im } => complex_form(*re, *im),
            Value::Str(s) => s.to_string(),
            Value::Tuple(items) => tuple_form(items, |v| v.render(config)),
            Value::Expr(e) if config == PrintConfig::global() => DisplayForm::get(e).clone(),
            Value::Expr(e) => e.render(config),
        }
    }

    pub fn render_tex(&self, config: &PrintConfig) -> String {
        match self {
            Value::Int(i) => i.to_string(),
            Value::Float(f) => format!("{f:?}"),
            Value::Complex { re, im } => format!("{re:?} + {im:?} i"),
            Value::Str(s) => format!("\\text{{{s}}}"),
            Value::Tuple(items) => {
                let inner: Vec<String> = items.iter().map(|v| v.render_tex(config)).collect();
                format!("\\left({}\\right)", inner.join(", "))
            }
            Value::Expr(e) if config == PrintConfig::global() => TexForm::get(e).clone(),
            Value::Expr(e) => e.render_tex(config),
        }
    }

    /// Structural repr; strings are quoted, one-element tuples keep their trailing comma.
    pub fn srepr(&self) -> String {
        match self {
            Value::Str(s) => quote(s),
            Value::Tuple(items) => tuple_form(items, Value::srepr),
            Value::Expr(e) => e.srepr().to_string(),
            other => other.render(PrintConfig::global()),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(DisplayForm::get(self))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Expr(e) => fmt::Display::fmt(e, f),
            other => f.write_str(&other.render(PrintConfig::global())),
        }
    }
}
