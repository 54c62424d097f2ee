//! Font stage behavior through the pipeline: inlining, fallback, preconnect,
//! escaping and repeated passes

mod common;

use common::{
    CountingResolver, FailingResolver, GOOGLE_INTER, GOOGLE_ROBOTO, TYPEKIT_KIT,
    document_with_links, font_link, html_escape_attr,
};
use kodegen_tools_postprocess::font_optimizer::{extract_font_candidates, inline_font_css};
use kodegen_tools_postprocess::postprocess::FONT_OPTIMIZER_STAGE;
use kodegen_tools_postprocess::{
    FontManifest, FontOptimizer, FontProvider, PostProcessError, PostProcessor,
    ProcessingOptions, RenderContext,
};

const PLACEHOLDER: &str = r#"<meta name="next-font-preconnect"/>"#;

fn fonts_on() -> ProcessingOptions {
    ProcessingOptions::new().optimize_fonts(true)
}

async fn optimize(markup: &str, context: &RenderContext) -> String {
    PostProcessor::with_default_stages()
        .run(markup.to_string(), context, &fonts_on())
        .await
        .expect("font pass should succeed")
}

#[tokio::test]
async fn roboto_scenario_with_custom_provider() {
    let url = "https://fonts.example.com/css?f=Roboto";
    let input = format!(
        r#"<head><link rel="stylesheet" data-href="{url}" nonce="abc"/>{PLACEHOLDER}</head>"#
    );

    let mut processor = PostProcessor::new();
    processor
        .register_gated(
            "fonts",
            FontOptimizer::with_providers(vec![FontProvider::new(
                "https://fonts.example.com",
                "https://fonts.example.com",
            )]),
            ProcessingOptions::fonts_enabled,
        )
        .unwrap();

    let mut manifest = FontManifest::new();
    manifest.insert(url, "@font-face{...}");
    let context = RenderContext::new().with_font_resolver(manifest);

    let out = processor.run(input, &context, &fonts_on()).await.unwrap();

    assert_eq!(
        out,
        format!(
            r#"<head><link rel="preconnect" href="https://fonts.example.com" crossorigin /><style data-href="{url}" nonce="abc">@font-face{{...}}</style></head>"#
        )
    );
}

#[tokio::test]
async fn resolved_font_is_inlined_and_link_removed() {
    let link = font_link(GOOGLE_INTER, Some("n0nce"));
    let input = document_with_links(&link);
    let context = RenderContext::new().with_font_resolver(CountingResolver::default());

    let out = optimize(&input, &context).await;

    let style = format!(
        r#"<style data-href="{GOOGLE_INTER}" nonce="n0nce">{}</style></head>"#,
        CountingResolver::css_for(GOOGLE_INTER)
    );
    assert!(out.contains(&style), "missing inlined style in {out}");
    assert!(!out.contains(&link), "original link kept in {out}");
    assert!(out.contains(r#"<link rel="preconnect" href="https://fonts.gstatic.com" crossorigin />"#));
    assert!(!out.contains(PLACEHOLDER));
}

#[tokio::test]
async fn unresolved_font_gets_fallback_link() {
    let link = font_link(GOOGLE_INTER, None);
    let input = document_with_links(&link);
    let context = RenderContext::new().with_font_resolver(|_: &str| -> Option<String> { None });

    let out = optimize(&input, &context).await;

    assert!(out.contains(&format!(
        r#"<link rel="stylesheet" href="{GOOGLE_INTER}"/></head>"#
    )));
    assert!(!out.contains(&format!(r#"<style data-href="{GOOGLE_INTER}""#)));
    // The data-href link stays; no provider was used so no preconnect
    assert!(out.contains(&link));
    assert!(!out.contains("rel=\"preconnect\""));
    assert!(!out.contains(PLACEHOLDER));
}

#[tokio::test]
async fn second_pass_changes_nothing() {
    let links = format!(
        "{}{}",
        font_link(GOOGLE_INTER, Some("abc")),
        font_link(TYPEKIT_KIT, None)
    );
    let input = document_with_links(&links);
    // Inter resolves, the Typekit kit does not
    let context = RenderContext::new().with_font_resolver(|url: &str| {
        (url == GOOGLE_INTER).then(|| "@font-face{font-family:Inter}".to_string())
    });

    let once = optimize(&input, &context).await;
    let twice = optimize(&once, &context).await;
    assert_eq!(once, twice);
}

#[tokio::test]
async fn repeated_mutate_skips_optimized_candidates() {
    let input = document_with_links(&font_link(GOOGLE_INTER, Some("abc")));
    let candidates = extract_font_candidates(
        &scraper::Html::parse_document(&input),
        FontOptimizer::new().providers(),
    );
    let resolver = CountingResolver::default();
    let providers = FontOptimizer::new().providers().to_vec();

    let once = inline_font_css(input, &candidates, &resolver, &providers)
        .await
        .unwrap();
    let twice = inline_font_css(once.clone(), &candidates, &resolver, &providers)
        .await
        .unwrap();

    assert_eq!(once, twice);
    assert_eq!(resolver.calls(), 1, "guard should skip the resolver");
}

#[tokio::test]
async fn preconnect_is_emitted_once_per_origin() {
    let links = format!(
        "{}{}{}",
        font_link(GOOGLE_INTER, None),
        font_link(GOOGLE_ROBOTO, None),
        font_link(TYPEKIT_KIT, None)
    );
    let context = RenderContext::new().with_font_resolver(CountingResolver::default());

    let out = optimize(&document_with_links(&links), &context).await;

    assert_eq!(out.matches(r#"href="https://fonts.gstatic.com""#).count(), 1);
    assert_eq!(out.matches(r#"href="https://use.typekit.net""#).count(), 1);
    assert_eq!(out.matches(r#"rel="preconnect""#).count(), 2);
    // First-encountered provider comes first
    let google = out.find("https://fonts.gstatic.com").unwrap();
    let typekit = out.find(r#"href="https://use.typekit.net""#).unwrap();
    assert!(google < typekit);
}

#[tokio::test]
async fn special_characters_do_not_over_match() {
    let target = "https://fonts.googleapis.com/css?family=Open+Sans:(400).x";
    // An unescaped pattern built from `target` would match this URL first
    let lookalike = "https://fonts.googleapis.com/cssfamily=OpennSans:400Ax";
    let links = format!("{}{}", font_link(lookalike, None), font_link(target, None));
    let context = RenderContext::new()
        .with_font_resolver(move |url: &str| (url == target).then(|| "css".to_string()));

    let out = optimize(&document_with_links(&links), &context).await;

    assert!(!out.contains(&font_link(target, None)), "target link kept: {out}");
    assert!(out.contains(&font_link(lookalike, None)), "lookalike removed: {out}");
    assert!(out.contains(&format!(r#"<style data-href="{target}">css</style>"#)));
}

#[tokio::test]
async fn ampersands_are_escaped_in_new_tags() {
    let link = font_link(GOOGLE_ROBOTO, None);
    let context = RenderContext::new().with_font_resolver(CountingResolver::default());

    let out = optimize(&document_with_links(&link), &context).await;

    let escaped = html_escape_attr(GOOGLE_ROBOTO);
    assert!(out.contains(&format!(r#"<style data-href="{escaped}">"#)));
    assert!(!out.contains(&link));
}

#[tokio::test]
async fn without_resolver_markup_is_untouched() {
    let input = document_with_links(&font_link(GOOGLE_INTER, None));
    let out = optimize(&input, &RenderContext::new()).await;
    assert_eq!(out, input);
}

#[tokio::test]
async fn resolver_with_no_candidates_clears_placeholder() {
    let input = document_with_links("");
    let context = RenderContext::new().with_font_resolver(CountingResolver::default());
    let out = optimize(&input, &context).await;
    assert_eq!(out, input.replace(PLACEHOLDER, ""));
}

#[tokio::test]
async fn only_first_placeholder_is_replaced() {
    let input = format!(
        "<html><head>{PLACEHOLDER}{}</head><body>{PLACEHOLDER}</body></html>",
        font_link(GOOGLE_INTER, None)
    );
    let context = RenderContext::new().with_font_resolver(CountingResolver::default());

    let out = optimize(&input, &context).await;

    assert_eq!(out.matches(PLACEHOLDER).count(), 1);
    assert!(out.starts_with(r#"<html><head><link rel="preconnect""#));
    assert!(out.ends_with(&format!("<body>{PLACEHOLDER}</body></html>")));
}

#[tokio::test]
async fn missing_head_leaves_links_alone() {
    let link = font_link(GOOGLE_INTER, None);
    let input = format!("<html><body>{link}</body></html>");
    let resolver = CountingResolver::default();
    let context = RenderContext::new().with_font_resolver(resolver.clone());

    let out = optimize(&input, &context).await;

    assert_eq!(out, input);
    assert_eq!(resolver.calls(), 0);
}

#[tokio::test]
async fn resolver_failure_fails_the_run() {
    let input = document_with_links(&font_link(GOOGLE_INTER, None));
    let context = RenderContext::new().with_font_resolver(FailingResolver);

    let err = PostProcessor::with_default_stages()
        .run(input, &context, &fonts_on())
        .await
        .unwrap_err();

    assert!(matches!(err, PostProcessError::Mutate { .. }));
    assert_eq!(err.stage(), Some(FONT_OPTIMIZER_STAGE));
    assert!(err.to_string().contains("Failed to resolve font CSS"), "{err}");
}

#[tokio::test]
async fn very_long_font_url_is_inlined() {
    let url = format!("https://fonts.googleapis.com/css2?family={}", "a&".repeat(50_000));
    assert!(url.len() > 100_000);
    let input = document_with_links(&font_link(&url, None));
    let context = RenderContext::new().with_font_resolver(CountingResolver::default());

    let out = optimize(&input, &context).await;

    assert!(!out.contains(&font_link(&url, None)));
    assert!(out.contains(&format!(
        r#"<style data-href="{}">{}</style></head>"#,
        html_escape_attr(&url),
        CountingResolver::css_for(&url)
    )));
}

#[tokio::test]
async fn fonts_and_images_together() {
    let input = format!(
        r#"<html><head>{PLACEHOLDER}{}</head><body><img src="/hero.jpg" width="800" height="400"></body></html>"#,
        font_link(GOOGLE_INTER, None)
    );
    let context = RenderContext::new().with_font_resolver(CountingResolver::default());
    let options = ProcessingOptions::new()
        .optimize_fonts(true)
        .optimize_images(true);

    let out = PostProcessor::with_default_stages()
        .run(input, &context, &options)
        .await
        .unwrap();

    let style_end = out.find("</style>").unwrap();
    let preload = out
        .find(r#"<link rel="preload" href="/hero.jpg" as="image"/>"#)
        .unwrap();
    let head_end = out.find("</head>").unwrap();
    assert!(style_end < preload && preload < head_end, "{out}");
}
