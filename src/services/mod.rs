pub mod answer_parser;
pub mod hallucination_filter;
pub mod injector;
pub mod llm_service;
pub mod prompt_builder;
pub mod question_extractor;

pub use answer_parser::parse_response;
pub use hallucination_filter::filter_hallucinations;
pub use injector::{ControlFamily, FieldInjector, FillStrategy};
pub use llm_service::{build_generator, AnswerGenerator, ModelResponse, OllamaGenerator};
pub use prompt_builder::PromptBuilder;
pub use question_extractor::QuestionExtractor;
