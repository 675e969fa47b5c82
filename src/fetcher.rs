//! Question fetching.
//!
//! The UI loop never awaits a request. [`Fetcher::spawn`] runs the request
//! on a tokio task and delivers a [`FetchOutcome`] over a channel; the
//! controller decides whether the outcome is still wanted.

use std::future::Future;
use std::time::Duration;

use serde::Deserialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::FetchError;
use crate::models::{Category, Difficulty, Question};

pub const DEFAULT_API_URL: &str = "https://opentdb.com";

/// Questions requested per quiz.
pub const QUESTION_COUNT: usize = 10;

/// A request for one batch, tagged with the generation it was issued in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchRequest {
    pub generation: u64,
    pub category: Category,
    pub difficulty: Difficulty,
}

#[derive(Debug)]
pub struct FetchOutcome {
    pub request: FetchRequest,
    pub result: Result<Vec<Question>, FetchError>,
}

/// Anything that can produce a question batch for a request.
pub trait QuestionSource: Clone + Send + Sync + 'static {
    fn fetch(
        &self,
        request: &FetchRequest,
    ) -> impl Future<Output = Result<Vec<Question>, FetchError>> + Send;
}

/// Open Trivia Database client.
#[derive(Debug, Clone)]
pub struct OpenTdb {
    client: reqwest::Client,
    base_url: String,
}

impl OpenTdb {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn request_url(&self, request: &FetchRequest) -> String {
        format!(
            "{}/api.php?amount={}&category={}&difficulty={}",
            self.base_url,
            QUESTION_COUNT,
            request.category.id(),
            request.difficulty.as_str()
        )
    }
}

impl QuestionSource for OpenTdb {
    fn fetch(
        &self,
        request: &FetchRequest,
    ) -> impl Future<Output = Result<Vec<Question>, FetchError>> + Send {
        let client = self.client.clone();
        let url = self.request_url(request);

        async move {
            log::debug!("GET {}", url);
            let body = client
                .get(&url)
                .send()
                .await?
                .error_for_status()?
                .text()
                .await?;
            parse_response(&body)
        }
    }
}

#[derive(Deserialize)]
struct ApiResponse {
    #[serde(default)]
    response_code: u8,
    #[serde(default)]
    results: Vec<Question>,
}

/// Decode a provider response body. Results keep the provider's order.
pub fn parse_response(body: &str) -> Result<Vec<Question>, FetchError> {
    let response: ApiResponse = serde_json::from_str(body)?;
    if response.response_code != 0 {
        return Err(FetchError::Api(response.response_code));
    }
    Ok(response.results)
}

/// Runs requests against a [`QuestionSource`] in the background.
pub struct Fetcher<S> {
    source: S,
    sender: mpsc::UnboundedSender<FetchOutcome>,
}

impl<S: QuestionSource> Fetcher<S> {
    pub fn new(source: S, sender: mpsc::UnboundedSender<FetchOutcome>) -> Self {
        Self { source, sender }
    }

    /// Start `request` on a new task. Must be called inside a tokio runtime.
    pub fn spawn(&self, request: FetchRequest) -> JoinHandle<()> {
        log::info!(
            "fetching {} questions for {} / {} (request #{})",
            QUESTION_COUNT,
            request.category,
            request.difficulty,
            request.generation
        );

        let source = self.source.clone();
        let sender = self.sender.clone();

        tokio::spawn(async move {
            let result = source.fetch(&request).await;
            if sender.send(FetchOutcome { request, result }).is_err() {
                log::debug!("request #{} finished after shutdown", request.generation);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use crate::models::QuestionKind;

    #[derive(Clone)]
    struct FakeSource {
        questions: Vec<Question>,
        calls: Arc<AtomicUsize>,
    }

    impl QuestionSource for FakeSource {
        fn fetch(
            &self,
            _request: &FetchRequest,
        ) -> impl Future<Output = Result<Vec<Question>, FetchError>> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let questions = self.questions.clone();
            async move { Ok(questions) }
        }
    }

    /// One-shot HTTP server on a local port. Answers the first connection
    /// with `status` and `body` and hands back the request head it read.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let server = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let head = read_head(&mut stream).await;
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            let _ = stream.shutdown().await;
            head
        });

        (base_url, server)
    }

    async fn read_head(stream: &mut tokio::net::TcpStream) -> String {
        let mut head = Vec::new();
        let mut chunk = [0u8; 1024];
        while !head.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            head.extend_from_slice(&chunk[..n]);
        }
        String::from_utf8_lossy(&head).into_owned()
    }

    fn request() -> FetchRequest {
        FetchRequest {
            generation: 1,
            category: Category::GeneralKnowledge,
            difficulty: Difficulty::Easy,
        }
    }

    #[test]
    fn test_request_url() {
        let client = OpenTdb::new("https://opentdb.com/", None).unwrap();
        assert_eq!(
            client.request_url(&request()),
            "https://opentdb.com/api.php?amount=10&category=9&difficulty=easy"
        );

        let hard_history = FetchRequest {
            generation: 2,
            category: Category::History,
            difficulty: Difficulty::Hard,
        };
        assert_eq!(
            client.request_url(&hard_history),
            "https://opentdb.com/api.php?amount=10&category=23&difficulty=hard"
        );
    }

    #[test]
    fn test_parse_response_keeps_order() {
        let body = r#"{
            "response_code": 0,
            "results": [
                {"type": "boolean", "difficulty": "easy", "category": "General Knowledge",
                 "question": "First?", "correct_answer": "True", "incorrect_answers": ["False"]},
                {"type": "multiple", "difficulty": "easy", "category": "General Knowledge",
                 "question": "Second &amp; last?", "correct_answer": "A",
                 "incorrect_answers": ["B", "C", "D"]}
            ]
        }"#;
        let questions = parse_response(body).unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].text, "First?");
        assert_eq!(questions[0].kind, QuestionKind::Boolean);
        assert_eq!(questions[1].text, "Second &amp; last?");
    }

    #[test]
    fn test_parse_response_api_error() {
        let body = r#"{"response_code": 1, "results": []}"#;
        assert!(matches!(parse_response(body), Err(FetchError::Api(1))));
    }

    #[test]
    fn test_parse_response_invalid_json() {
        assert!(matches!(
            parse_response("<html>busy</html>"),
            Err(FetchError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_over_http() {
        let body = r#"{"response_code": 0, "results": [
            {"type": "multiple", "difficulty": "easy", "category": "General Knowledge",
             "question": "Capital of France?", "correct_answer": "Paris",
             "incorrect_answers": ["Lyon", "Nice", "Lille"]}
        ]}"#;
        let (base_url, server) = serve_once("200 OK", body).await;
        let client = OpenTdb::new(&base_url, Some(Duration::from_secs(5))).unwrap();

        let questions = client.fetch(&request()).await.unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].correct_answer, "Paris");

        let head = server.await.unwrap();
        assert!(head.starts_with("GET /api.php?amount=10&category=9&difficulty=easy HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_fetch_error_status() {
        let (base_url, server) = serve_once("500 Internal Server Error", "{}").await;
        let client = OpenTdb::new(&base_url, None).unwrap();

        match client.fetch(&request()).await {
            Err(FetchError::Http(e)) => {
                assert_eq!(e.status(), Some(reqwest::StatusCode::INTERNAL_SERVER_ERROR));
            }
            other => panic!("expected an HTTP error, got {:?}", other),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_fetch_api_code_over_http() {
        let (base_url, server) = serve_once("200 OK", r#"{"response_code": 1, "results": []}"#).await;
        let client = OpenTdb::new(&base_url, None).unwrap();

        assert!(matches!(client.fetch(&request()).await, Err(FetchError::Api(1))));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_fetch_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let server = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            read_head(&mut stream).await;
            tokio::time::sleep(Duration::from_secs(5)).await;
        });

        let client = OpenTdb::new(&base_url, Some(Duration::from_millis(100))).unwrap();
        match client.fetch(&request()).await {
            Err(FetchError::Http(e)) => assert!(e.is_timeout()),
            other => panic!("expected a timeout, got {:?}", other),
        }
        server.abort();
    }

    #[tokio::test]
    async fn test_spawn_delivers_outcome() {
        let calls = Arc::new(AtomicUsize::new(0));
        let source = FakeSource {
            questions: vec![Question::boolean("Q", true)],
            calls: Arc::clone(&calls),
        };
        let (tx, mut rx) = mpsc::unbounded_channel();
        let fetcher = Fetcher::new(source, tx);

        fetcher.spawn(request()).await.unwrap();

        let outcome = rx.recv().await.unwrap();
        assert_eq!(outcome.request, request());
        assert_eq!(outcome.result.unwrap().len(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
