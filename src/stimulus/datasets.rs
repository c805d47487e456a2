use rand::Rng;

use super::model::{AlaghiTreeModel, DotProductModel, MatrixMultModel};
use super::{
    encode, lfsr_sequence, mif_bits, mif_numbers, mif_words, random_values, select_sequence, words,
    DataFile, ADDER_INPUTS, ADDER_RESULTS, DATA_VECTORS, DP_RESULTS, INPUT_MATRICES, MM_RESULT,
    MM_SELECT_STREAMS, SELECT_STREAMS, WEIGHT_MATRICES, WEIGHT_VECTORS,
};
use crate::bits::select_width;
use crate::config::{AdderMode, Representation};
use crate::plan::PlanError;

/// Stimulus for `alaghi_nadder_tb`: one shared sequence encodes every input.
#[derive(Debug, Clone)]
pub struct AdderTreeData {
    pub values: Vec<u64>,
    pub inputs: Vec<Vec<bool>>,
    pub results: Vec<bool>,
}

impl AdderTreeData {
    pub fn generate<R: Rng>(n: usize, length: usize, rng: &mut R) -> Result<Self, PlanError> {
        let mut model = AlaghiTreeModel::new(n)?;
        let values = random_values(n, length, rng);
        let sequence = lfsr_sequence(length, rng);
        let streams: Vec<Vec<bool>> = values.iter().map(|&v| encode(v, &sequence)).collect();
        let inputs = words(&streams, length);
        let results = model.run(&inputs);
        Ok(Self {
            values,
            inputs,
            results,
        })
    }

    pub fn files(&self) -> Vec<DataFile> {
        vec![
            DataFile::new(ADDER_INPUTS, mif_words(&self.inputs)),
            DataFile::new(ADDER_RESULTS, mif_bits(&self.results)),
        ]
    }
}

/// Stimulus for `sc_dot_product_tb`.
///
/// All data streams share one sequence and all weight streams another, so
/// data and weights are uncorrelated with each other.
#[derive(Debug, Clone)]
pub struct DotProductData {
    pub dimension: usize,
    pub data: Vec<Vec<bool>>,
    pub weights: Vec<Vec<bool>>,
    /// Present in selector mode only.
    pub select: Option<Vec<usize>>,
    pub results: Vec<bool>,
}

impl DotProductData {
    pub fn generate<R: Rng>(
        dimension: usize,
        rep: Representation,
        adder: AdderMode,
        length: usize,
        rng: &mut R,
    ) -> Result<Self, PlanError> {
        let mut model = DotProductModel::new(dimension, rep, adder)?;
        let data_values = random_values(dimension, length, rng);
        let weight_values = random_values(dimension, length, rng);
        let data_sequence = lfsr_sequence(length, rng);
        let weight_sequence = lfsr_sequence(length, rng);

        let data = words(
            &data_values
                .iter()
                .map(|&v| encode(v, &data_sequence))
                .collect::<Vec<_>>(),
            length,
        );
        let weights = words(
            &weight_values
                .iter()
                .map(|&v| encode(v, &weight_sequence))
                .collect::<Vec<_>>(),
            length,
        );
        let select = match adder {
            AdderMode::Selector => Some(select_sequence(dimension, length, rng)),
            AdderMode::Alaghi => None,
        };

        let results = (0..length)
            .map(|t| {
                let sel = select.as_ref().map_or(0, |s| s[t]);
                model.step(&data[t], &weights[t], sel)
            })
            .collect();

        Ok(Self {
            dimension,
            data,
            weights,
            select,
            results,
        })
    }

    pub fn files(&self) -> Vec<DataFile> {
        let mut files = vec![
            DataFile::new(DATA_VECTORS, mif_words(&self.data)),
            DataFile::new(WEIGHT_VECTORS, mif_words(&self.weights)),
        ];
        if let Some(select) = &self.select {
            files.push(DataFile::new(
                SELECT_STREAMS,
                mif_numbers(select, select_width(self.dimension)),
            ));
        }
        files.push(DataFile::new(DP_RESULTS, mif_bits(&self.results)));
        files
    }
}

/// Stimulus for `sc_matrix_mult_tb`.
///
/// Each row of the input matrix and each row of the transposed weight
/// matrix gets its own sequence; the select stream is shared by all cells.
#[derive(Debug, Clone)]
pub struct MatrixMultData {
    pub input: usize,
    pub inputs: Vec<Vec<bool>>,
    pub weights: Vec<Vec<bool>>,
    pub select: Option<Vec<usize>>,
    pub results: Vec<Vec<bool>>,
}

impl MatrixMultData {
    pub fn generate<R: Rng>(
        batch: usize,
        input: usize,
        output: usize,
        rep: Representation,
        adder: AdderMode,
        length: usize,
        rng: &mut R,
    ) -> Result<Self, PlanError> {
        let mut model = MatrixMultModel::new(batch, input, output, rep, adder)?;
        let inputs = words(&matrix_streams(batch, input, length, rng), length);
        let weights = words(&matrix_streams(output, input, length, rng), length);
        let select = match adder {
            AdderMode::Selector => Some(select_sequence(input, length, rng)),
            AdderMode::Alaghi => None,
        };

        let results = (0..length)
            .map(|t| {
                let sel = select.as_ref().map_or(0, |s| s[t]);
                model.step(&inputs[t], &weights[t], sel)
            })
            .collect();

        Ok(Self {
            input,
            inputs,
            weights,
            select,
            results,
        })
    }

    pub fn files(&self) -> Vec<DataFile> {
        let mut files = vec![
            DataFile::new(INPUT_MATRICES, mif_words(&self.inputs)),
            DataFile::new(WEIGHT_MATRICES, mif_words(&self.weights)),
        ];
        if let Some(select) = &self.select {
            files.push(DataFile::new(
                MM_SELECT_STREAMS,
                mif_numbers(select, select_width(self.input)),
            ));
        }
        files.push(DataFile::new(MM_RESULT, mif_words(&self.results)));
        files
    }
}

/// Streams for a `rows x cols` matrix, flattened row-major, with a fresh
/// sequence per row.
fn matrix_streams<R: Rng>(rows: usize, cols: usize, length: usize, rng: &mut R) -> Vec<Vec<bool>> {
    let mut streams = Vec::with_capacity(rows * cols);
    for _ in 0..rows {
        let values = random_values(cols, length, rng);
        let sequence = lfsr_sequence(length, rng);
        streams.extend(values.iter().map(|&v| encode(v, &sequence)));
    }
    streams
}
