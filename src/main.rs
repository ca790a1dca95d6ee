use csp_forge::{
    compile, DirectiveFlag, DirectiveName, DirectiveSpec, Policy, SourceExpr, TransformRegistry,
};

fn main() {
    println!("CSP header compiler example");

    let policy = Policy::builder()
        .https_only(true)
        .directive(
            DirectiveName::DefaultSrc,
            DirectiveSpec::new().allow(DirectiveFlag::Self_),
        )
        .directive(
            DirectiveName::ScriptSrc,
            DirectiveSpec::new()
                .allow(DirectiveFlag::Self_)
                .domains("https://cdn.example.org"),
        )
        .directive(
            DirectiveName::ImgSrc,
            DirectiveSpec::new()
                .allow(DirectiveFlag::Self_)
                .domain(SourceExpr::Data),
        )
        .build();

    let headers = compile(&policy, &TransformRegistry::default());
    for header in headers.materialize(None) {
        println!("{}: {}", header.kind().name(), header.value());
    }

    println!("Run the middleware demo with: cargo run --example nonce_demo");
}
