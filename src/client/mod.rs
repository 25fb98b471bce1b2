mod gitea;
mod trait_def;

pub use gitea::GiteaClient;
pub use trait_def::ForgeClient;
