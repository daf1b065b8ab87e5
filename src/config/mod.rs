/**
Define and control Structs for deserialization of the task file
(`config.toml`)
*/
use std::{fs, path::Path};

use serde::Deserialize;

use crate::error::TaskError;

use self::bands_config::BandsTask;
pub mod bands_config;

/**
Config file struct for deserialization
# Field:
  * title: String,
  * tasks: Task - Struct of Task
*/
#[derive(Deserialize, Debug)]
pub struct Config {
    title: String,
    tasks: Task,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(config_file: P) -> Result<Self, TaskError> {
        let text = fs::read_to_string(config_file)?;
        Ok(toml::from_str(&text)?)
    }

    pub fn title(&self) -> &str {
        self.title.as_ref()
    }

    pub fn tasks(&self) -> &Task {
        &self.tasks
    }
}
/**
Task of run.
# Field:
  * bands: Option<BandsTask> - Optional field to store config of a band-structure calculation
*/
#[derive(Deserialize, Debug)]
pub struct Task {
    bands: Option<BandsTask>,
}

impl Task {
    pub fn bands(&self) -> Option<&BandsTask> {
        self.bands.as_ref()
    }
}

pub trait TaskProcess {
    type Output;
    fn task_execute(&self) -> Result<Self::Output, TaskError>;
}

#[cfg(test)]
#[test]
fn test_toml() {
    use crate::config::bands_config::ModelKind;

    let config: Config = toml::from_str(
        r#"title = "graphene band structure"

[tasks]
[tasks.bands]
seed = "./graphene"
total_samples = 301
parallel = true
[[tasks.bands.points]]
label = "G"
coord = [0.0, 0.0, 0.0]
[[tasks.bands.points]]
label = "K"
coord = [0.6666666667, 0.3333333333, 0.0]
[tasks.bands.model]
kind = "graphene"
hopping = -2.7
"#,
    )
    .unwrap();
    assert_eq!(config.title(), "graphene band structure");
    let bands = config.tasks().bands().unwrap();
    assert_eq!(bands.seed(), "./graphene");
    assert_eq!(bands.total_samples(), 301);
    assert!(bands.parallel());
    assert!(bands.plot());
    assert_eq!(bands.points().len(), 2);
    assert_eq!(bands.points()[1].label(), "K");
    assert_eq!(bands.model().kind(), ModelKind::Graphene);
    assert_eq!(bands.model().onsite(), 0.0);
}
