//! Document text source.
//!
//! Binary formats are not parsed: text comes either from a plain-text file or
//! from the bundled sample contract.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Sample services contract returned in place of real PDF extraction.
pub const SAMPLE_CONTRACT: &str = r#"CONTRATO DE PRESTACIÓN DE SERVICIOS PROFESIONALES

En Madrid, a 4 de Mayo de 2025

REUNIDOS

De una parte, DON JOSÉ GARCÍA LÓPEZ, mayor de edad, con domicilio en Calle Mayor 25, 28001 Madrid, y con DNI número 12345678A, actuando en su propio nombre y derecho (en adelante, el "CLIENTE").

Y de otra parte, DOÑA MARÍA RODRÍGUEZ SÁNCHEZ, mayor de edad, con domicilio profesional en Avenida de la Constitución 15, 28002 Madrid, y con DNI número 87654321B, actuando en su propio nombre y derecho (en adelante, el "PROFESIONAL").

Ambas partes (en adelante, conjuntamente, las "Partes"), reconociéndose mutuamente capacidad legal suficiente para contratar y obligarse en la representación que actúan y siendo responsables de la veracidad de sus manifestaciones,

EXPONEN

I. Que el CLIENTE está interesado en contratar los servicios profesionales del PROFESIONAL, consistentes en asesoramiento legal en materia contractual.

II. Que el PROFESIONAL tiene los conocimientos y la experiencia necesarios para prestar dichos servicios.

III. Que las Partes están interesadas en celebrar un contrato de prestación de servicios en virtud del cual el PROFESIONAL preste al CLIENTE los servicios que aquí se definen.

IV. Que las Partes han acordado otorgar el presente contrato de prestación de servicios profesionales (en adelante, el "Contrato"), con sujeción a las siguientes:

CLÁUSULAS

PRIMERA.- OBJETO
El objeto del presente Contrato es la prestación por parte del PROFESIONAL al CLIENTE de servicios de asesoramiento legal en materia contractual (en adelante, los "Servicios").

SEGUNDA.- DURACIÓN
El presente Contrato tendrá una duración de 12 meses, comenzando a surtir efectos en la fecha de su firma. 

TERCERA.- HONORARIOS
El CLIENTE abonará al PROFESIONAL, como contraprestación por los Servicios, la cantidad de CIEN EUROS (100 €) por hora de trabajo, con un mínimo de 10 horas mensuales.

CUARTA.- FORMA DE PAGO
El pago de los honorarios se realizará mediante transferencia bancaria a la cuenta que indique el PROFESIONAL, dentro de los primeros cinco días de cada mes.

QUINTA.- OBLIGACIONES DEL PROFESIONAL
El PROFESIONAL se compromete a:
- Prestar los Servicios con diligencia y profesionalidad.
- Mantener informado al CLIENTE del desarrollo de su actividad.
- Guardar secreto sobre toda la información que reciba del CLIENTE.

SEXTA.- OBLIGACIONES DEL CLIENTE
El CLIENTE se compromete a:
- Facilitar al PROFESIONAL toda la información necesaria para la correcta prestación de los Servicios.
- Abonar los honorarios acordados en el plazo establecido.

SEPTIMA.- RESOLUCIÓN DEL CONTRATO
Este contrato no podrá ser resuelto por ninguna de las partes.

OCTAVA.- LEY APLICABLE Y JURISDICCIÓN
El presente Contrato se regirá e interpretará de acuerdo con las leyes españolas.

Para la resolución de cualquier controversia que pudiera surgir en relación con la validez, interpretación, cumplimiento o resolución del presente Contrato, las Partes, con renuncia expresa a cualquier otro fuero que pudiera corresponderles, se someten al arbitraje.

Y en prueba de conformidad, las Partes firman el presente Contrato por duplicado y a un solo efecto, en el lugar y fecha indicados en el encabezamiento.

EL CLIENTE                                    EL PROFESIONAL
________________                       ________________
"#;

/// Where document text comes from.
#[derive(Debug, Clone)]
pub enum DocumentSource {
    Sample,
    File(PathBuf),
}

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("PDF extraction is not supported; provide the document as plain text: {0}")]
    UnsupportedFormat(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DocumentSource {
    /// Source from an optional path; no path means the sample contract.
    pub fn from_path(path: Option<&Path>) -> Self {
        match path {
            Some(p) => DocumentSource::File(p.to_path_buf()),
            None => DocumentSource::Sample,
        }
    }

    /// Load the document text.
    pub async fn load(&self) -> Result<String, DocumentError> {
        match self {
            DocumentSource::Sample => Ok(SAMPLE_CONTRACT.to_string()),
            DocumentSource::File(path) => {
                let is_pdf = path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
                if is_pdf {
                    return Err(DocumentError::UnsupportedFormat(path.clone()));
                }
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| DocumentError::Io {
                        path: path.clone(),
                        source,
                    })
            }
        }
    }
}
