//! Persisted quote record built from a fully confirmed calculation.

use serde::{Deserialize, Serialize};

use crate::error::{QuoteError, Result};
use crate::model::{Typology, VariableInput};
use crate::pricing::checked_price;
use crate::workflow::{ConfirmationFlow, LEGACY_HANDLE_SLOT};

/// Category recorded for the implicit selection of legacy handle pieces.
pub const LEGACY_HANDLE_CATEGORY: &str = "puxador";

/// One variable as the user entered it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputRecord {
    #[serde(rename = "nome")]
    pub name: String,
    pub label: String,
    #[serde(rename = "valor")]
    pub value: Option<f64>,
    #[serde(rename = "unidade")]
    pub unit: String,
}

/// One technical configuration selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionRecord {
    pub slot: usize,
    #[serde(rename = "categoria")]
    pub category: String,
    #[serde(rename = "valor")]
    pub value: String,
}

/// One confirmed piece. Lengths are whole millimeters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieceRecord {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "largura_real_mm")]
    pub width_real_mm: i64,
    #[serde(rename = "altura_real_mm")]
    pub height_real_mm: i64,
    #[serde(rename = "largura_cobranca_mm")]
    pub width_billing_mm: i64,
    #[serde(rename = "altura_cobranca_mm")]
    pub height_billing_mm: i64,
    #[serde(rename = "area_cobranca_m2")]
    pub area_billing_m2: f64,
    #[serde(rename = "imagem_url")]
    pub image_url: Option<String>,
    #[serde(rename = "configuracoes_tecnicas")]
    pub technical_configurations: Vec<SelectionRecord>,
}

/// Quote line as handed to the persistence layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRecord {
    #[serde(rename = "variaveis_entrada")]
    pub inputs: Vec<InputRecord>,
    #[serde(rename = "pecas_calculadas")]
    pub pieces: Vec<PieceRecord>,
    #[serde(rename = "area_total_real_m2")]
    pub area_total_real_m2: f64,
    #[serde(rename = "area_total_cobranca_m2")]
    pub area_total_billing_m2: f64,
    #[serde(rename = "preco_m2")]
    pub price_per_m2: f64,
    #[serde(rename = "preco_total")]
    pub price_total: f64,
}

impl QuoteRecord {
    /// Build the record once every piece of `flow` is confirmed.
    pub fn build(
        typology: &Typology,
        inputs: &[VariableInput],
        flow: &ConfirmationFlow,
        price_per_m2: f64,
    ) -> Result<Self> {
        let result = flow.result();
        if !result.errors.is_empty() {
            return Err(QuoteError::CalculationFailed {
                errors: result.errors.clone(),
            });
        }
        if !flow.is_complete() {
            return Err(QuoteError::PiecesNotConfirmed {
                pending: flow.pending_count(),
            });
        }

        let price_total = checked_price(result.area_total_billing_m2, price_per_m2)?;

        let inputs = inputs
            .iter()
            .map(|input| InputRecord {
                name: input.name.clone(),
                label: typology
                    .find_variable(&input.name)
                    .map(|v| v.label.clone())
                    .unwrap_or_default(),
                value: input.value,
                unit: input.unit.clone(),
            })
            .collect();

        let definitions = typology.ordered_pieces();
        let pieces = result
            .pieces
            .iter()
            .enumerate()
            .map(|(index, piece)| {
                let definition = definitions.get(index);
                let technical_configurations = piece
                    .selections
                    .iter()
                    .map(|(slot, item)| SelectionRecord {
                        slot: *slot,
                        category: definition
                            .and_then(|d| d.technical_configurations.get(*slot))
                            .map(|s| s.category.clone())
                            .or_else(|| {
                                definition
                                    .filter(|d| d.uses_legacy_handle() && *slot == LEGACY_HANDLE_SLOT)
                                    .map(|_| LEGACY_HANDLE_CATEGORY.to_string())
                            })
                            .unwrap_or_default(),
                        value: item.clone(),
                    })
                    .collect();

                PieceRecord {
                    name: piece.name.clone(),
                    width_real_mm: whole_mm(piece.width_real_mm),
                    height_real_mm: whole_mm(piece.height_real_mm),
                    width_billing_mm: whole_mm(piece.width_billing_mm),
                    height_billing_mm: whole_mm(piece.height_billing_mm),
                    area_billing_m2: piece.area_billing_m2,
                    image_url: piece.image_url.clone(),
                    technical_configurations,
                }
            })
            .collect();

        Ok(Self {
            inputs,
            pieces,
            area_total_real_m2: result.area_total_real_m2,
            area_total_billing_m2: result.area_total_billing_m2,
            price_per_m2,
            price_total,
        })
    }
}

fn whole_mm(value_mm: f64) -> i64 {
    value_mm.round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::calculate;
    use crate::config::{CalcConfig, Unit};
    use crate::model::{Piece, TechnicalConfigSlot, Variable};
    use pretty_assertions::assert_eq;

    fn typology() -> Typology {
        let mut legacy = Piece::new("Móvel", "Lv/2 - 15", "Av - 20");
        legacy.legacy_handle = true;
        Typology::new("Porta de correr")
            .with_variable(Variable::new("Lv", "Largura do vão").with_unit(Unit::Centimeter))
            .with_variable(Variable::new("Av", "Altura do vão").with_unit(Unit::Centimeter))
            .with_piece(
                Piece::new("Fixa", "Lv/2 - 15", "Av - 20")
                    .with_slot(TechnicalConfigSlot::new("trinco", true)),
            )
            .with_piece(legacy)
    }

    fn inputs() -> Vec<VariableInput> {
        vec![
            VariableInput::new("Lv", Some(180.0), Unit::Centimeter),
            VariableInput::new("Av", Some(220.0), Unit::Centimeter),
        ]
    }

    fn flow() -> ConfirmationFlow {
        let typology = typology();
        let result = calculate(&typology, &inputs(), &CalcConfig::default());
        ConfirmationFlow::new(&typology, result)
    }

    #[test]
    fn test_build_requires_confirmation() {
        let flow = flow();
        match QuoteRecord::build(&typology(), &inputs(), &flow, 350.0) {
            Err(QuoteError::PiecesNotConfirmed { pending }) => assert_eq!(pending, 2),
            other => panic!("Expected PiecesNotConfirmed, got {:?}", other),
        }
    }

    #[test]
    fn test_build_confirmed_quote() {
        let mut flow = flow();
        flow.select(0, "trinco-inox");
        flow.confirm();
        flow.select(LEGACY_HANDLE_SLOT, "puxador-concha");
        flow.confirm();

        let record = QuoteRecord::build(&typology(), &inputs(), &flow, 350.0).unwrap();
        assert_eq!(record.inputs[0].label, "Largura do vão");
        assert_eq!(record.inputs[1].unit, "cm");
        assert_eq!(record.pieces.len(), 2);
        assert_eq!(record.pieces[0].width_real_mm, 885);
        assert_eq!(record.pieces[0].height_billing_mm, 2200);
        assert_eq!(
            record.pieces[0].technical_configurations,
            vec![SelectionRecord {
                slot: 0,
                category: "trinco".to_string(),
                value: "trinco-inox".to_string(),
            }]
        );
        assert_eq!(
            record.pieces[1].technical_configurations[0].category,
            LEGACY_HANDLE_CATEGORY
        );
        assert_eq!(record.price_total, 1386.0);

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["pecas_calculadas"][0]["largura_real_mm"], 885);
        assert_eq!(json["variaveis_entrada"][0]["nome"], "Lv");
        assert_eq!(json["preco_m2"], 350.0);
    }

    #[test]
    fn test_build_rejects_failed_calculation() {
        let typology = typology();
        let result = calculate(&typology, &[], &CalcConfig::default());
        let flow = ConfirmationFlow::new(&typology, result);
        assert!(matches!(
            QuoteRecord::build(&typology, &[], &flow, 350.0),
            Err(QuoteError::CalculationFailed { .. })
        ));
    }

    #[test]
    fn test_whole_mm() {
        assert_eq!(whole_mm(885.4), 885);
        assert_eq!(whole_mm(885.5), 886);
        assert_eq!(whole_mm(0.0), 0);
    }
}
