//! Prompts sent to the code-generation model
//!
//! The system prompt frames the model as a script generator. The user prompt
//! carries the quiz page, the requester and the LLM credential the generated
//! program must reuse for its own completion call.

/// System prompt for solver script generation
pub const SYSTEM_PROMPT_SOLVER: &str = "You are a helpful assistant that generates python scripts.";

/// Everything the solver prompt is rendered from
#[derive(Debug, Clone, Copy)]
pub struct SolverPromptInput<'a> {
    /// Page holding the task
    pub url: &'a str,
    /// Requester identity, for submissions that need it
    pub email: &'a str,
    /// Completion endpoint the generated program should call
    pub llm_endpoint: &'a str,
    /// Bearer token the generated program should send to that endpoint
    pub llm_token: &'a str,
}

/// Render the user prompt asking for a standalone solver program.
///
/// The token is embedded verbatim; the generated program is expected to use
/// it for its own call to `llm_endpoint`.
pub fn build_solver_prompt(input: &SolverPromptInput<'_>) -> String {
    format!(
        r#"You are an intelligent code generator. Write a python program using httpx that reads the page at {url} and then:
1. Finds the quiz on that page. It may involve data sourcing, preparation, analysis or visualization.
2. Computes the answer by calling the LLM chat completions API at {llm_endpoint} with the header "Authorization: Bearer {llm_token}".
3. POSTs the answer to the submission endpoint given on that page, on behalf of {email}.

Include every header the LLM request and the submission need, and encode both bodies as the endpoints expect (JSON unless the page says otherwise).
The program must be complete and ready to run with no arguments and no input.
Output only the program source. Do not write any explanation, preamble or closing remarks."#,
        url = input.url,
        email = input.email,
        llm_endpoint = input.llm_endpoint,
        llm_token = input.llm_token,
    )
}
