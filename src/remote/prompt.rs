use minijinja::{context, Environment};

const TEMPLATE_NAME: &str = "sentiment";

const SENTIMENT_TEMPLATE: &str = "Analyze the sentiment of the following text: '{{ text }}'. \
Respond with only 'positive' or 'negative' and a confidence score between 0 and 1. \
Do not include any other text.";

/// Renders the single-turn classification prompt.
pub struct PromptTemplate {
    env: Environment<'static>,
}

impl PromptTemplate {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template(TEMPLATE_NAME, SENTIMENT_TEMPLATE)?;
        Ok(Self { env })
    }

    pub fn render(&self, text: &str) -> Result<String, minijinja::Error> {
        self.env
            .get_template(TEMPLATE_NAME)?
            .render(context! { text => text })
    }
}
