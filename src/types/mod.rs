pub mod anamnese;
pub mod client;
pub mod colaborador;
pub mod conta;
pub mod exame;
pub mod exame_cli;
pub mod healthz;
pub mod medico;
pub mod org;
pub mod principal;
pub mod request;
pub mod response;
pub mod role;
