use schemars::JsonSchema;
fn main() {
    let mut generator = schemars::gen::SchemaSettings::openapi3()
        .with(|s| {
            s.inline_subschemas = true;
            s.meta_schema = None;
        })
        .with_visitor(kube::core::schema::StructuralSchemaRewriter)
        .into_generator();
    print!(
        "{}",
        serde_json::to_string_pretty(&knative_serving_manifests::resources::Image::json_schema(
            &mut generator
        ))
        .unwrap()
    )
}
