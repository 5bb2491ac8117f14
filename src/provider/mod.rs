mod constants;
pub mod gemini;

pub use gemini::{
    ChatSession, ClientContext, Content, GeminiClient, GenerateContentResponse, GenerativeModel,
    Part,
};
