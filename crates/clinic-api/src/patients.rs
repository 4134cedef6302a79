use crate::client::BackendClient;
use crate::response::Fallback;
use clinic_core::{ClinicError, Patient, PatientForm, Result};
use reqwest::Method;
use tracing::info;

const PATIENTS: &str = "pacientes";

const LIST: Fallback = Fallback {
    failure: "Falha ao buscar os dados dos pacientes.",
    not_found: "Nenhum paciente encontrado.",
};
const GET: Fallback = Fallback {
    failure: "Falha ao buscar os dados do paciente.",
    not_found: "Paciente não encontrado.",
};
const CREATE: Fallback = Fallback {
    failure: "Falha ao criar paciente.",
    not_found: "Falha ao criar paciente.",
};
const UPDATE: Fallback = Fallback {
    failure: "Falha ao atualizar paciente.",
    not_found: "Paciente não encontrado.",
};
const DELETE: Fallback = Fallback {
    failure: "Falha ao excluir paciente.",
    not_found: "Paciente não encontrado.",
};

impl BackendClient {
    pub async fn list_patients(&self, token: &str) -> Result<Vec<Patient>> {
        self.fetch(token, &["api", PATIENTS], LIST).await
    }

    pub async fn get_patient(&self, token: &str, id: &str) -> Result<Patient> {
        self.fetch(token, &["api", PATIENTS, id], GET).await
    }

    pub async fn create_patient(&self, token: &str, form: &PatientForm) -> Result<()> {
        form.validate().map_err(ClinicError::Validation)?;
        self.write(Method::POST, token, &["api", PATIENTS], Some(form), CREATE).await?;
        info!("patient created");
        Ok(())
    }

    pub async fn update_patient(&self, token: &str, id: &str, form: &PatientForm) -> Result<()> {
        form.validate().map_err(ClinicError::Validation)?;
        self.write(Method::PUT, token, &["api", PATIENTS, id], Some(form), UPDATE).await?;
        info!(patient = id, "patient updated");
        Ok(())
    }

    pub async fn delete_patient(&self, token: &str, id: &str) -> Result<()> {
        self.remove(token, &["api", PATIENTS, id], DELETE).await?;
        info!(patient = id, "patient deleted");
        Ok(())
    }
}
