// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{chat_completion, extraction_output, llm_settings, KNOWN_CODE};
use std::time::Duration;
use truthhunt::domain::models::entity::NOT_FOUND;
use truthhunt::domain::models::search_result::SearchResult;
use truthhunt::domain::services::extraction_service::{EntityExtractor, ExtractionError};
use truthhunt::infrastructure::llm::OpenAiExtractor;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn extractor(base_url: &str) -> OpenAiExtractor {
    OpenAiExtractor::new(&llm_settings(base_url), Duration::from_secs(2)).unwrap()
}

fn inputs() -> Vec<SearchResult> {
    vec![SearchResult::new(
        "成都华鲲振宇智能科技有限责任公司 - 企查查".to_string(),
        format!("统一社会信用代码：{}", KNOWN_CODE),
        "https://www.qcc.com/firm/0.html".to_string(),
        "www.qcc.com".to_string(),
    )]
}

#[tokio::test]
async fn test_structured_output_is_parsed_into_entity() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(chat_completion(&extraction_output(82))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let entity = extractor(&server.uri()).extract(&inputs()).await.unwrap();
    assert_eq!(entity.unified_code, KNOWN_CODE);
    assert_eq!(entity.confidence, 82);
    assert_eq!(entity.shareholder, NOT_FOUND);
    assert_eq!(entity.sources.len(), 1);
}

#[tokio::test]
async fn test_fenced_output_is_accepted() {
    let server = MockServer::start().await;
    let fenced = format!("```json\n{}\n```", extraction_output(70));
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_completion(&fenced)))
        .mount(&server)
        .await;

    let entity = extractor(&server.uri()).extract(&inputs()).await.unwrap();
    assert_eq!(entity.confidence, 70);
}

#[tokio::test]
async fn test_malformed_output_is_a_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(chat_completion("I could not find this company, sorry.")),
        )
        .mount(&server)
        .await;

    let err = extractor(&server.uri()).extract(&inputs()).await.unwrap_err();
    assert!(matches!(err, ExtractionError::Parse(_)));
}

#[tokio::test]
async fn test_provider_error_carries_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream overloaded"))
        .mount(&server)
        .await;

    let err = extractor(&server.uri()).extract(&inputs()).await.unwrap_err();
    assert_eq!(
        err,
        ExtractionError::Provider {
            status: 500,
            body: "upstream overloaded".to_string()
        }
    );
}

#[tokio::test]
async fn test_transport_error_keeps_cause_without_url() {
    let err = extractor("http://127.0.0.1:1").extract(&inputs()).await.unwrap_err();
    let ExtractionError::Transport(message) = &err else {
        panic!("expected transport error, got {:?}", err);
    };

    assert!(!message.contains("/chat/completions"));
    assert!(!message.contains("sk-test"));
    assert!(message.to_lowercase().contains("connect"));
}
