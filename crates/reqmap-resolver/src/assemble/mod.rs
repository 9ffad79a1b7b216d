//! Configuration assembly
//!
//! Serializes a merged SetupConfig into the loader's native configuration
//! shape and renders a standalone initialization script around it.

use indexmap::IndexMap;
use reqmap_core::types::{PrefixContext, UrlPrefix};
use serde_json::{json, Map, Value};

use crate::setup::{ConfiguredModule, ModuleLayout, SetupConfig};

/// Global the script binds the configuration object to
pub const CONFIG_GLOBAL: &str = "webjarsRequireConfig";

/// Assembled configuration
#[derive(Debug, Clone, PartialEq)]
pub struct SetupOutput {
    /// Module id -> loader configuration fragment
    pub json: Value,
    /// Script declaring the configuration and handing it to the loader
    pub script: String,
}

/// Assemble `config` into its JSON object and initialization script
///
/// `context` supplies the local prefix used by the script's `webjars.path`
/// helper.
pub fn assemble(config: &SetupConfig, context: &PrefixContext) -> SetupOutput {
    let mut object = Map::new();
    for (id, configured) in config.iter() {
        object.insert(id.clone(), fragment(configured));
    }
    let json = Value::Object(object);
    let script = render_script(&json, &versions(config), context.fallback());

    SetupOutput { json, script }
}

/// Native loader fragment for one module
fn fragment(configured: &ConfiguredModule) -> Value {
    let module = &configured.module;
    let mut fragment = Map::new();

    match module.layout {
        ModuleLayout::Paths => {
            fragment.insert("paths".to_string(), json!({ &module.id: module.locations }));
        },
        ModuleLayout::Package => {
            let mut package = Map::new();
            package.insert("name".to_string(), json!(module.id));
            package.insert("location".to_string(), json!(module.locations));
            if let Some(main) = &module.main {
                package.insert("main".to_string(), json!(main));
            }
            fragment.insert("packages".to_string(), json!([package]));
        },
    }

    if let Some(shim) = &configured.shim {
        fragment.insert("shim".to_string(), json!({ &module.id: shim }));
    }

    Value::Object(fragment)
}

/// Raw package name -> version, first module of each package wins
fn versions(config: &SetupConfig) -> IndexMap<&str, &str> {
    let mut versions = IndexMap::new();
    for (_, configured) in config.iter() {
        let module = &configured.module;
        versions
            .entry(module.package.as_str())
            .or_insert(module.version.as_str());
    }
    versions
}

fn render_script(json: &Value, versions: &IndexMap<&str, &str>, local: &UrlPrefix) -> String {
    let versions_literal = script_literal(&json!(versions), false);
    let prefix_literal = script_literal(&json!(local.url), false);
    let config_literal = script_literal(json, true);

    let path_body = if local.include_version {
        format!(
            "return {} + webjarid + '/' + webjars.versions[webjarid] + '/' + path;",
            prefix_literal
        )
    } else {
        format!("return {} + webjarid + '/' + path;", prefix_literal)
    };

    format!(
        r#"var webjars = {{
    versions: {versions},
    path: function(webjarid, path) {{
        {path_body}
    }}
}};

var {global} = {config};

var require = {{
    callback: function() {{
        for (var id in {global}) {{
            if (Object.prototype.hasOwnProperty.call({global}, id)) {{
                requirejs.config({global}[id]);
            }}
        }}
    }}
}};
"#,
        versions = versions_literal,
        path_body = path_body,
        global = CONFIG_GLOBAL,
        config = config_literal,
    )
}

/// JSON text safe to embed inside an inline `<script>` element
fn script_literal(value: &Value, pretty: bool) -> String {
    let text = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    // Serializing a Value cannot fail
    .unwrap_or_default();
    text.replace("</", "<\\/")
}

impl SetupOutput {
    /// Pretty-printed JSON object
    pub fn json_text(&self) -> String {
        serde_json::to_string_pretty(&self.json).unwrap_or_default()
    }

    /// All fragments flattened into a single loader configuration object
    pub fn combined(&self) -> Value {
        let mut paths = Map::new();
        let mut packages = Vec::new();
        let mut shim = Map::new();

        if let Value::Object(modules) = &self.json {
            for fragment in modules.values() {
                if let Some(Value::Object(entries)) = fragment.get("paths") {
                    paths.extend(entries.clone());
                }
                if let Some(Value::Array(entries)) = fragment.get("packages") {
                    packages.extend(entries.iter().cloned());
                }
                if let Some(Value::Object(entries)) = fragment.get("shim") {
                    shim.extend(entries.clone());
                }
            }
        }

        let mut combined = Map::new();
        if !paths.is_empty() {
            combined.insert("paths".to_string(), Value::Object(paths));
        }
        if !packages.is_empty() {
            combined.insert("packages".to_string(), Value::Array(packages));
        }
        if !shim.is_empty() {
            combined.insert("shim".to_string(), Value::Object(shim));
        }
        Value::Object(combined)
    }
}
