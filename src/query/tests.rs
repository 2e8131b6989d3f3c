use super::*;

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::{DeploymentConfig, VectorFieldConfig, VectorTopology};
use crate::constants::MAX_RESULT_WINDOW;
use crate::model::{
    FacetRequest, HighlightRequest, RangeBound, RangeFacet, SearchRequest, SearchStrategy,
    SortDirection, SortSpec,
};
use crate::service::ServiceError;

fn books_deployment() -> DeploymentConfig {
    DeploymentConfig::new("books", &["title", "description"])
        .default_fields(&["id", "title", "description", "type", "title_vector"])
        .excluded_fields(&["_version_"])
        .vector_field(VectorFieldConfig::inline("title", "title", "title_vector").top_k(5))
        .vector_field(
            VectorFieldConfig::inline("chunks", "body", "chunk_vector").topology(
                VectorTopology::ChildCollection {
                    collection: "book_chunks".to_string(),
                    parent_id_field: "book_id".to_string(),
                },
            ),
        )
}

fn translator() -> QueryTranslator {
    QueryTranslator::new(Arc::new(books_deployment()))
}

fn vectors(names: &[&str]) -> HashMap<String, Arc<Vec<f32>>> {
    names
        .iter()
        .map(|n| (n.to_string(), Arc::new(vec![0.1, 0.2, 0.3])))
        .collect()
}

#[test]
fn test_keyword_query_has_no_vector_fragment() {
    let query = translator()
        .translate(&SearchRequest::new("machine learning"), &HashMap::new())
        .expect("translate");

    assert_eq!(query.get("q"), Some("machine learning"));
    assert_eq!(query.get("defType"), Some("edismax"));
    assert_eq!(query.get("qf"), Some("title description"));
    assert!(query.iter().all(|(_, values)| values.iter().all(|v| !v.contains("{!knn"))));
    assert!(!query.contains("vq"));
}

#[test]
fn test_keyword_blank_query_matches_all() {
    let query = translator()
        .translate(&SearchRequest::new("  "), &HashMap::new())
        .expect("translate");
    assert_eq!(query.get("q"), Some("*:*"));
}

#[test]
fn test_paging_projection_filters_and_sort() {
    let request = SearchRequest::new("rust")
        .offset(20)
        .limit(5)
        .filter("type:book")
        .filter("year:[2000 TO *]")
        .exclude("description")
        .sort(SortSpec::new("year", SortDirection::Desc));

    let query = translator().translate(&request, &HashMap::new()).expect("translate");

    assert_eq!(query.get("start"), Some("20"));
    assert_eq!(query.get("rows"), Some("5"));
    assert_eq!(query.get_all("fq"), ["type:book", "year:[2000 TO *]"]);
    assert_eq!(query.get("sort"), Some("year desc"));
    // vector target and request exclusions are dropped, id stays first.
    assert_eq!(query.get("fl"), Some("id,title,type"));
    assert_eq!(query.field_list(), "id,title,type");
}

#[test]
fn test_default_page_size_and_sort() {
    let mut deployment = books_deployment();
    deployment.default_page_size = 25;
    deployment.default_sort = Some(SortSpec::new("score", SortDirection::Desc));

    let query = QueryTranslator::new(Arc::new(deployment))
        .translate(&SearchRequest::new("rust"), &HashMap::new())
        .expect("translate");

    assert_eq!(query.get("rows"), Some("25"));
    assert_eq!(query.get("start"), Some("0"));
    assert_eq!(query.get("sort"), Some("score desc"));
}

#[test]
fn test_include_fields_override_defaults() {
    let request = SearchRequest::new("rust").include("subtitle").include("id");

    let query = translator().translate(&request, &HashMap::new()).expect("translate");
    assert_eq!(query.get("fl"), Some("id,subtitle"));
}

#[test]
fn test_semantic_single_field_inline_fragment() {
    let mut request = SearchRequest::new("neural nets").strategy(SearchStrategy::Semantic);
    request.vector_fields = vec!["title".to_string()];

    let query = translator()
        .translate(&request, &vectors(&["title"]))
        .expect("translate");

    assert_eq!(query.get("q"), Some("{!knn f=title_vector topK=5}[0.1,0.2,0.3]"));
    assert!(!query.contains("defType"));
}

#[test]
fn test_semantic_multiple_fields_use_bool_union() {
    let request = SearchRequest::new("neural nets").strategy(SearchStrategy::Semantic);

    let query = translator()
        .translate(&request, &vectors(&["title", "chunks"]))
        .expect("translate");

    assert_eq!(
        query.get("q"),
        Some("{!bool should=$vq.title should=$vq.chunks}")
    );
    assert_eq!(
        query.get("vq.title"),
        Some("{!knn f=title_vector topK=5}[0.1,0.2,0.3]")
    );
    assert!(query.get("vq.chunks").is_some());
}

#[test]
fn test_child_collection_fragment_references_chunks_and_join_key() {
    let mut request = SearchRequest::new("neural nets").strategy(SearchStrategy::Semantic);
    request.vector_fields = vec!["chunks".to_string()];

    let query = translator()
        .translate(&request, &vectors(&["chunks"]))
        .expect("translate");

    let q = query.get("q").expect("q");
    assert_eq!(
        q,
        "{!join fromIndex=book_chunks from=book_id to=id score=max v='{!knn f=chunk_vector topK=10}[0.1,0.2,0.3]'}"
    );
}

#[test]
fn test_embedded_doc_fragment() {
    let resolver = VectorQueryResolver::new("id");
    let field = VectorFieldConfig::inline("para", "text", "para_vector")
        .top_k(3)
        .topology(VectorTopology::EmbeddedDoc {
            parent_filter: "doc_type:book".to_string(),
        });

    let fragment = resolver.build_fragment(&field, &[1.0, -0.5]);
    assert_eq!(
        fragment.as_str(),
        "{!parent which=\"doc_type:book\" score=max v='{!knn f=para_vector topK=3}[1,-0.5]'}"
    );
}

#[test]
fn test_keyword_with_semantic_boost() {
    let mut request =
        SearchRequest::new("machine learning").strategy(SearchStrategy::KeywordWithSemanticBoost);
    request.vector_fields = vec!["title".to_string()];

    let query = translator()
        .translate(&request, &vectors(&["title"]))
        .expect("translate");

    assert_eq!(query.get("q"), Some("{!bool should=$kq should=$boosted}"));
    assert_eq!(query.get("kq"), Some("{!edismax qf='title description' v=$qq}"));
    assert_eq!(query.get("qq"), Some("machine learning"));
    assert_eq!(query.get("boosted"), Some("{!boost b=0.3 v=$vq}"));
    assert!(query.get("vq").expect("vq").starts_with("{!knn f=title_vector"));
}

#[test]
fn test_semantic_with_keyword_boost_swaps_weights() {
    let mut deployment = books_deployment();
    deployment.hybrid_boost = 0.25;
    let mut request =
        SearchRequest::new("machine learning").strategy(SearchStrategy::SemanticWithKeywordBoost);
    request.vector_fields = vec!["title".to_string()];

    let query = QueryTranslator::new(Arc::new(deployment))
        .translate(&request, &vectors(&["title"]))
        .expect("translate");

    assert_eq!(query.get("q"), Some("{!bool should=$vq should=$boosted}"));
    assert_eq!(query.get("boosted"), Some("{!boost b=0.25 v=$kq}"));
}

#[test]
fn test_facet_params() {
    let request = SearchRequest::new("rust")
        .facet(FacetRequest {
            limit: Some(5),
            missing: true,
            ..FacetRequest::field("type")
        })
        .facet(FacetRequest::field("category"))
        .facet(FacetRequest {
            range: Some(RangeFacet {
                start: RangeBound::Int(0),
                end: RangeBound::Int(100),
                gap: RangeBound::Int(25),
            }),
            ..FacetRequest::field("price")
        });

    let query = translator().translate(&request, &HashMap::new()).expect("translate");

    assert_eq!(query.get("facet"), Some("true"));
    assert_eq!(query.get_all("facet.field"), ["type", "category"]);
    assert_eq!(query.get_all("facet.range"), ["price"]);
    assert_eq!(query.get("f.type.facet.limit"), Some("5"));
    assert_eq!(query.get("f.type.facet.missing"), Some("true"));
    assert!(!query.contains("f.category.facet.missing"));
    assert_eq!(query.get("f.price.facet.range.start"), Some("0"));
    assert_eq!(query.get("f.price.facet.range.end"), Some("100"));
    assert_eq!(query.get("f.price.facet.range.gap"), Some("25"));
}

#[test]
fn test_no_facet_params_without_facets() {
    let query = translator()
        .translate(&SearchRequest::new("rust"), &HashMap::new())
        .expect("translate");
    assert!(!query.contains("facet"));
    assert!(!query.contains("hl"));
}

#[test]
fn test_highlight_params() {
    let request = SearchRequest::new("rust").highlight(HighlightRequest {
        fields: vec![],
        fragment_size: Some(120),
        snippets: Some(2),
    });

    let query = translator().translate(&request, &HashMap::new()).expect("translate");

    assert_eq!(query.get("hl"), Some("true"));
    assert_eq!(query.get("hl.fl"), Some("title,description"));
    assert_eq!(query.get("hl.fragsize"), Some("120"));
    assert_eq!(query.get("hl.snippets"), Some("2"));
    assert!(!query.contains("hl.q"));
}

#[test]
fn test_semantic_highlight_uses_query_text() {
    let request = SearchRequest::new("neural nets")
        .strategy(SearchStrategy::Semantic)
        .highlight(HighlightRequest {
            fields: vec!["description".to_string()],
            ..Default::default()
        });

    let query = translator()
        .translate(&request, &vectors(&["title", "chunks"]))
        .expect("translate");
    assert_eq!(query.get("hl.q"), Some("neural nets"));
    assert_eq!(query.get("hl.fl"), Some("description"));
}

#[test]
fn test_semantic_without_vector_fields_is_client_error() {
    let translator = QueryTranslator::new(Arc::new(DeploymentConfig::new("books", &["title"])));
    let request = SearchRequest::new("rust").strategy(SearchStrategy::Semantic);

    let err = translator.validate(&request).unwrap_err();
    assert!(matches!(err, ServiceError::Client(_)));
}

#[test]
fn test_unknown_vector_field_is_client_error() {
    let mut request = SearchRequest::new("rust").strategy(SearchStrategy::Semantic);
    request.vector_fields = vec!["nope".to_string()];

    let err = translator().vector_fields_for(&request).unwrap_err();
    assert!(matches!(err, ServiceError::Client(ref m) if m.contains("nope")));
}

#[test]
fn test_blank_semantic_query_is_client_error() {
    let request = SearchRequest::new(" ").strategy(SearchStrategy::KeywordWithSemanticBoost);
    assert!(matches!(
        translator().validate(&request),
        Err(ServiceError::Client(_))
    ));
}

#[test]
fn test_limit_bounds() {
    let translator = translator();
    assert!(matches!(
        translator.validate(&SearchRequest::new("x").limit(0)),
        Err(ServiceError::Client(_))
    ));
    assert!(matches!(
        translator.validate(&SearchRequest::new("x").limit(1001)),
        Err(ServiceError::Client(_))
    ));
    assert!(translator.validate(&SearchRequest::new("x").limit(1000)).is_ok());
}

#[test]
fn test_offset_must_fit_result_window() {
    let translator = translator();

    for offset in [u64::MAX, MAX_RESULT_WINDOW] {
        let err = translator
            .validate(&SearchRequest::new("x").offset(offset))
            .unwrap_err();
        assert!(matches!(err, ServiceError::Client(_)), "offset {}", offset);
    }

    let last_page = MAX_RESULT_WINDOW - 10;
    assert!(translator.validate(&SearchRequest::new("x").offset(last_page)).is_ok());
    assert!(
        translator
            .validate(&SearchRequest::new("x").offset(last_page).limit(11))
            .is_err()
    );
}

#[test]
fn test_missing_vector_is_internal_error() {
    let request = SearchRequest::new("rust").strategy(SearchStrategy::Semantic);
    let err = translator()
        .translate(&request, &vectors(&["title"]))
        .unwrap_err();
    assert!(matches!(err, ServiceError::Internal(_)));
}

#[test]
fn test_vector_fields_for_keyword_is_empty() {
    let translator = translator();
    let fields = translator
        .vector_fields_for(&SearchRequest::new("rust"))
        .expect("keyword never fails");
    assert!(fields.is_empty());
}

#[test]
fn test_translated_query_pairs_preserve_repeats() {
    let mut query = TranslatedQuery::new();
    query.append("fq", "a:1");
    query.append("fq", "b:2");
    query.set("q", "x");
    query.set("q", "y");

    assert_eq!(query.pairs(), vec![("fq", "a:1"), ("fq", "b:2"), ("q", "y")]);
}

#[test]
fn test_projection_excludes_vectors_and_globals() {
    let deployment = books_deployment();
    let request = SearchRequest::new("x").exclude("type");
    let projection = FieldProjection::for_request(&deployment, &request);

    assert!(projection.is_excluded("_version_"));
    assert!(projection.is_excluded("chunk_vector"));
    assert!(projection.is_excluded("type"));
    assert!(!projection.is_excluded("id"));
}

#[test]
fn test_excluded_id_still_requested() {
    let deployment = books_deployment();
    let request = SearchRequest::new("x").exclude("id");
    let projection = FieldProjection::for_request(&deployment, &request);

    assert!(projection.is_excluded("id"));
    assert_eq!(projection.field_list(), "id,title,description,type");
}

#[test]
fn test_projection_without_defaults_requests_everything() {
    let deployment = DeploymentConfig::new("books", &["title"]);
    let projection = FieldProjection::for_request(&deployment, &SearchRequest::new("x"));
    assert_eq!(projection.field_list(), "id,*");
}
