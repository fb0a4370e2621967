//! Plain-text rendering of a calculation, used by the CLI.

use std::fmt;

use crate::model::{CalculationResult, Typology, VariableInput};
use crate::pricing::price;
use crate::units::INVALID_DISPLAY;

/// Human-readable summary of one calculation run.
pub struct Report<'a> {
    pub typology: &'a Typology,
    pub inputs: &'a [VariableInput],
    pub result: &'a CalculationResult,
    /// Price per billed m², when a material was chosen.
    pub price_per_m2: Option<f64>,
}

impl<'a> Report<'a> {
    pub fn new(
        typology: &'a Typology,
        inputs: &'a [VariableInput],
        result: &'a CalculationResult,
    ) -> Self {
        Self {
            typology,
            inputs,
            result,
            price_per_m2: None,
        }
    }

    /// Include the price line.
    pub fn with_price(mut self, price_per_m2: f64) -> Self {
        self.price_per_m2 = Some(price_per_m2);
        self
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tipologia: {}", self.typology.name)?;

        write!(f, "\nVariáveis:")?;
        for input in self.inputs {
            let label = self
                .typology
                .find_variable(&input.name)
                .map(|v| v.label.as_str())
                .filter(|l| !l.is_empty());
            let value = input
                .value
                .map(|v| v.to_string())
                .unwrap_or_else(|| INVALID_DISPLAY.to_string());
            match label {
                Some(label) => write!(f, "\n  {} ({}) = {} {}", input.name, label, value, input.unit)?,
                None => write!(f, "\n  {} = {} {}", input.name, value, input.unit)?,
            }
        }

        if self.result.pieces.is_empty() {
            write!(f, "\nPeças: nenhuma")?;
        } else {
            write!(f, "\nPeças:")?;
        }
        for (idx, piece) in self.result.pieces.iter().enumerate() {
            write!(
                f,
                "\n  {}. {}: {:.1} x {:.1} mm, cobrança {:.0} x {:.0} mm, {:.4} m² / {:.4} m²",
                idx + 1,
                piece.name,
                piece.width_real_mm,
                piece.height_real_mm,
                piece.width_billing_mm,
                piece.height_billing_mm,
                piece.area_real_m2,
                piece.area_billing_m2
            )?;
        }

        write!(f, "\nÁrea real: {:.4} m²", self.result.area_total_real_m2)?;
        write!(
            f,
            "\nÁrea de cobrança: {:.4} m²",
            self.result.area_total_billing_m2
        )?;

        if let Some(price_per_m2) = self.price_per_m2 {
            if !self.result.has_fatal_error() {
                write!(
                    f,
                    "\nPreço: {:.4} m² x R$ {:.2} = R$ {:.2}",
                    self.result.area_total_billing_m2,
                    price_per_m2,
                    price(self.result.area_total_billing_m2, price_per_m2)
                )?;
            }
        }

        if !self.result.errors.is_empty() {
            write!(f, "\nErros:")?;
            for error in &self.result.errors {
                write!(f, "\n  - {}", error)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::calculate;
    use crate::config::{CalcConfig, Unit};
    use crate::model::{Piece, Variable};

    fn typology() -> Typology {
        Typology::new("Porta de correr")
            .with_variable(Variable::new("Lv", "Largura do vão").with_unit(Unit::Centimeter))
            .with_variable(Variable::new("Av", "Altura do vão").with_unit(Unit::Centimeter))
            .with_piece(Piece::new("Folha fixa", "Lv/2 - 15", "Av - 20"))
            .with_piece(Piece::new("Folha móvel", "Lv/2 - 15", "Av - 20"))
    }

    #[test]
    fn test_report_with_price() {
        let typology = typology();
        let inputs = vec![
            VariableInput::new("Lv", Some(180.0), Unit::Centimeter),
            VariableInput::new("Av", Some(220.0), Unit::Centimeter),
        ];
        let result = calculate(&typology, &inputs, &CalcConfig::default());
        let report = Report::new(&typology, &inputs, &result).with_price(350.0);

        insta::assert_snapshot!(report.to_string(), @r###"
        Tipologia: Porta de correr
        Variáveis:
          Lv (Largura do vão) = 180 cm
          Av (Altura do vão) = 220 cm
        Peças:
          1. Folha fixa: 885.0 x 2180.0 mm, cobrança 900 x 2200 mm, 1.9293 m² / 1.9800 m²
          2. Folha móvel: 885.0 x 2180.0 mm, cobrança 900 x 2200 mm, 1.9293 m² / 1.9800 m²
        Área real: 3.8586 m²
        Área de cobrança: 3.9600 m²
        Preço: 3.9600 m² x R$ 350.00 = R$ 1386.00
        "###);
    }

    #[test]
    fn test_report_with_errors() {
        let typology = typology();
        let inputs = vec![
            VariableInput::new("Lv", None, Unit::Centimeter),
            VariableInput::new("Av", Some(220.0), Unit::Centimeter),
        ];
        let result = calculate(&typology, &inputs, &CalcConfig::default());
        let report = Report::new(&typology, &inputs, &result).with_price(350.0);

        insta::assert_snapshot!(report.to_string(), @r###"
        Tipologia: Porta de correr
        Variáveis:
          Lv (Largura do vão) = - cm
          Av (Altura do vão) = 220 cm
        Peças: nenhuma
        Área real: 0.0000 m²
        Área de cobrança: 0.0000 m²
        Erros:
          - Variável "Lv" é inválida ou unidade incorreta
        "###);
    }
}
