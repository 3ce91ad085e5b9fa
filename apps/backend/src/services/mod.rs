pub mod gemini;
pub mod planner;
