use actix_web::{middleware::Logger, web, App, HttpRequest, HttpResponse, HttpServer, Result};
use csp_forge::{
    configure_csp, csp_with_nonce_rewrite, CspEngine, CspExtensions, DirectiveFlag, DirectiveName,
    DirectiveSpec, Policy, SourceExpr,
};

const LANDING_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>Nonce Rewrite Demo</title>
    <script src="/assets/app.js"></script>
</head>
<body>
    <h1>Content Security Policy Demo</h1>
    <p>View the page source: every script tag with attributes carries a fresh nonce.</p>

    <script type="module">
        console.log('stamped module script');
    </script>

    <!-- A bare script tag is left alone -->
    <script>console.log('bare inline script');</script>
</body>
</html>"#;

async fn index() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(LANDING_HTML))
}

async fn whoami(req: HttpRequest) -> Result<HttpResponse> {
    let body = format!(
        "request id: {}\nnonce: {}\n",
        req.request_id().unwrap_or_default(),
        req.csp_nonce().unwrap_or_default()
    );
    Ok(HttpResponse::Ok().content_type("text/plain").body(body))
}

async fn stats(engine: web::Data<CspEngine>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(engine.stats().snapshot()))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();

    let policy = Policy::builder()
        .https_only(true)
        .enable_nonces(true)
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
            DirectiveName::StyleSrc,
            DirectiveSpec::new()
                .allow(DirectiveFlag::Self_)
                .allow(DirectiveFlag::UnsafeInline),
        )
        .directive(
            DirectiveName::ImgSrc,
            DirectiveSpec::new()
                .allow(DirectiveFlag::Self_)
                .domain(SourceExpr::Data),
        )
        .directive(DirectiveName::ObjectSrc, DirectiveSpec::new().none(true))
        .build();

    let (csp, rewrite) = csp_with_nonce_rewrite(policy);
    let engine = csp.engine();

    println!("Server running at http://127.0.0.1:8080");
    println!("  GET /        HTML page with nonce-stamped script tags");
    println!("  GET /whoami  request id and nonce seen by the handler");
    println!("  GET /stats   middleware counters");

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(rewrite.clone())
            .wrap(csp.clone())
            .configure(configure_csp(engine.clone()))
            .route("/", web::get().to(index))
            .route("/whoami", web::get().to(whoami))
            .route("/stats", web::get().to(stats))
    })
    .bind("127.0.0.1:8080")?
    .run()
    .await
}
