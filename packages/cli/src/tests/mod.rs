



#[cfg(test)]
pub mod test_helpers {
    use chatcfg_storage::{ConfigStore, StaticPrompt};

    /// Fresh store with fixed defaults so responses are predictable
    pub fn create_test_store() -> ConfigStore {
        ConfigStore::builder()
            .default_model("gpt-default")
            .prompt_provider(StaticPrompt::new("default prompt"))
            .build()
            .unwrap()
    }
}
