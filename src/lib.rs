pub mod cli;
pub mod consts;
pub mod deploy;
pub mod docker_actions;
pub mod faas_client;
pub mod main_actions;
pub mod request;
pub mod stack;
pub mod util;
