pub const STORY_SYSTEM: &str = include_str!("../data/prompts/story_system.txt");
pub const STORY_USER: &str = include_str!("../data/prompts/story_user.txt");
pub const ILLUSTRATION: &str = include_str!("../data/prompts/illustration.txt");

/// Replace `{{key}}` placeholders in a template string.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.trim().to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{{{}}}}}", key), value);
    }
    result
}

pub fn story_prompt(name: &str, character: &str, topic: &str) -> String {
    render(
        STORY_USER,
        &[("name", name), ("character", character), ("topic", topic)],
    )
}

pub fn illustration_prompt(character: &str, topic: &str) -> String {
    render(ILLUSTRATION, &[("character", character), ("topic", topic)])
}
