//! Psychologists are listed from `/api/psicologos` but individually managed
//! as users under `/api/usuarios`.

use crate::client::BackendClient;
use crate::response::Fallback;
use clinic_core::{ClinicError, NewPsychologist, Psychologist, PsychologistUpdate, Result};
use reqwest::Method;
use tracing::info;

const LIST: Fallback = Fallback {
    failure: "Falha ao buscar os dados dos psicólogos.",
    not_found: "Nenhum psicólogo encontrado.",
};
const GET: Fallback = Fallback {
    failure: "Falha ao buscar os dados do psicólogo.",
    not_found: "Psicólogo não encontrado.",
};
const CREATE: Fallback = Fallback {
    failure: "Falha ao criar psicólogo.",
    not_found: "Falha ao criar psicólogo.",
};
const UPDATE: Fallback = Fallback {
    failure: "Falha ao atualizar psicólogo.",
    not_found: "Psicólogo não encontrado.",
};
const DELETE: Fallback = Fallback {
    failure: "Falha ao excluir psicólogo.",
    not_found: "Psicólogo não encontrado.",
};

impl BackendClient {
    pub async fn list_psychologists(&self, token: &str) -> Result<Vec<Psychologist>> {
        self.fetch(token, &["api", "psicologos"], LIST).await
    }

    pub async fn get_psychologist(&self, token: &str, id: &str) -> Result<Psychologist> {
        self.fetch(token, &["api", "usuarios", id], GET).await
    }

    pub async fn create_psychologist(&self, token: &str, new: &NewPsychologist) -> Result<()> {
        new.validate().map_err(ClinicError::Validation)?;
        self.write(Method::POST, token, &["api", "usuarios"], Some(&new.payload()), CREATE)
            .await?;
        info!(email = %new.email, "psychologist created");
        Ok(())
    }

    pub async fn update_psychologist(
        &self,
        token: &str,
        id: &str,
        update: &PsychologistUpdate,
    ) -> Result<()> {
        let update = update.clone().normalized();
        update.validate().map_err(ClinicError::Validation)?;
        self.write(Method::PUT, token, &["api", "usuarios", id], Some(&update), UPDATE).await?;
        info!(psychologist = id, "psychologist updated");
        Ok(())
    }

    pub async fn delete_psychologist(&self, token: &str, id: &str) -> Result<()> {
        self.remove(token, &["api", "usuarios", id], DELETE).await?;
        info!(psychologist = id, "psychologist deleted");
        Ok(())
    }
}
