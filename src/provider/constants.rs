pub mod gemini {
    pub const API_BASE: &str = "https://generativelanguage.googleapis.com";
    pub const API_VERSION: &str = "v1beta";
    pub const GENERATE_CONTENT_METHOD: &str = "generateContent";
    pub const API_KEY_HEADER: &str = "x-goog-api-key";
}
