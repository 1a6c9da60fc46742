//! WHO child growth standards
//!
//! Every row lists the measurement at -3, -2, -1, 0, +1, +2 and +3 standard
//! deviations, rounded to one decimal. Age tables hold one row per month from
//! birth to 60 months; up to 24 months height-for-age is recumbent length.
//! Weight-for-height tables hold one row per half centimetre from 45 to 120 cm,
//! taking weight-for-length rows below 65 cm.

pub type Row = [f64; 7];

pub const AGE_FIRST_MONTH: f64 = 0.0;
pub const AGE_STEP_MONTHS: f64 = 1.0;
pub const HEIGHT_FIRST_CM: f64 = 45.0;
pub const HEIGHT_STEP_CM: f64 = 0.5;

pub const WEIGHT_FOR_AGE_BOYS: [Row; 61] = [
    [2.1, 2.5, 2.9, 3.3, 3.9, 4.4, 5.0],
    [2.9, 3.4, 3.9, 4.5, 5.1, 5.8, 6.6],
    [3.8, 4.3, 4.9, 5.6, 6.3, 7.1, 8.0],
    [4.4, 5.0, 5.7, 6.4, 7.2, 8.0, 9.0],
    [4.9, 5.6, 6.2, 7.0, 7.8, 8.7, 9.7],
    [5.3, 6.0, 6.7, 7.5, 8.4, 9.3, 10.4],
    [5.7, 6.4, 7.1, 7.9, 8.8, 9.8, 10.9],
    [5.9, 6.7, 7.4, 8.3, 9.2, 10.3, 11.4],
    [6.2, 6.9, 7.7, 8.6, 9.6, 10.7, 11.9],
    [6.4, 7.1, 8.0, 8.9, 9.9, 11.0, 12.3],
    [6.6, 7.4, 8.2, 9.2, 10.2, 11.4, 12.7],
    [6.8, 7.6, 8.4, 9.4, 10.5, 11.7, 13.0],
    [6.9, 7.7, 8.6, 9.6, 10.8, 12.0, 13.3],
    [7.1, 7.9, 8.8, 9.9, 11.0, 12.3, 13.7],
    [7.2, 8.1, 9.0, 10.1, 11.3, 12.6, 14.0],
    [7.4, 8.3, 9.2, 10.3, 11.5, 12.8, 14.3],
    [7.5, 8.4, 9.4, 10.5, 11.7, 13.1, 14.6],
    [7.7, 8.6, 9.6, 10.7, 12.0, 13.4, 14.9],
    [7.8, 8.8, 9.8, 10.9, 12.2, 13.7, 15.3],
    [8.0, 8.9, 10.0, 11.1, 12.5, 13.9, 15.6],
    [8.1, 9.1, 10.1, 11.3, 12.7, 14.2, 15.9],
    [8.2, 9.2, 10.3, 11.5, 12.9, 14.5, 16.2],
    [8.4, 9.4, 10.5, 11.8, 13.2, 14.7, 16.5],
    [8.5, 9.5, 10.7, 12.0, 13.4, 15.0, 16.8],
    [8.6, 9.7, 10.8, 12.2, 13.6, 15.3, 17.1],
    [8.8, 9.8, 11.0, 12.4, 13.9, 15.5, 17.5],
    [8.9, 10.0, 11.2, 12.5, 14.1, 15.8, 17.8],
    [9.0, 10.1, 11.3, 12.7, 14.3, 16.1, 18.1],
    [9.1, 10.2, 11.5, 12.9, 14.5, 16.3, 18.4],
    [9.2, 10.4, 11.7, 13.1, 14.8, 16.6, 18.7],
    [9.4, 10.5, 11.8, 13.3, 15.0, 16.9, 19.0],
    [9.5, 10.7, 12.0, 13.5, 15.2, 17.1, 19.3],
    [9.6, 10.8, 12.1, 13.7, 15.4, 17.4, 19.6],
    [9.7, 10.9, 12.3, 13.8, 15.6, 17.6, 19.9],
    [9.8, 11.0, 12.4, 14.0, 15.8, 17.8, 20.2],
    [9.9, 11.2, 12.6, 14.2, 16.0, 18.1, 20.4],
    [10.0, 11.3, 12.7, 14.3, 16.2, 18.3, 20.7],
    [10.1, 11.4, 12.9, 14.5, 16.4, 18.6, 21.0],
    [10.2, 11.5, 13.0, 14.7, 16.6, 18.8, 21.3],
    [10.3, 11.6, 13.1, 14.8, 16.8, 19.0, 21.6],
    [10.4, 11.8, 13.3, 15.0, 17.0, 19.3, 21.9],
    [10.5, 11.9, 13.4, 15.2, 17.2, 19.5, 22.1],
    [10.6, 12.0, 13.6, 15.3, 17.4, 19.7, 22.4],
    [10.7, 12.1, 13.7, 15.5, 17.6, 20.0, 22.7],
    [10.8, 12.2, 13.8, 15.7, 17.8, 20.2, 23.0],
    [10.9, 12.4, 14.0, 15.8, 18.0, 20.5, 23.3],
    [11.0, 12.5, 14.1, 16.0, 18.2, 20.7, 23.6],
    [11.1, 12.6, 14.3, 16.2, 18.4, 20.9, 23.9],
    [11.2, 12.7, 14.4, 16.3, 18.6, 21.2, 24.2],
    [11.3, 12.8, 14.5, 16.5, 18.8, 21.4, 24.5],
    [11.4, 12.9, 14.7, 16.7, 19.0, 21.7, 24.8],
    [11.5, 13.1, 14.8, 16.8, 19.2, 21.9, 25.1],
    [11.6, 13.2, 15.0, 17.0, 19.4, 22.2, 25.4],
    [11.7, 13.3, 15.1, 17.2, 19.6, 22.4, 25.7],
    [11.8, 13.4, 15.2, 17.3, 19.8, 22.7, 26.0],
    [11.9, 13.5, 15.4, 17.5, 20.0, 22.9, 26.3],
    [12.0, 13.6, 15.5, 17.7, 20.2, 23.2, 26.6],
    [12.1, 13.7, 15.6, 17.8, 20.4, 23.4, 26.9],
    [12.2, 13.8, 15.8, 18.0, 20.6, 23.7, 27.2],
    [12.3, 14.0, 15.9, 18.2, 20.8, 23.9, 27.6],
    [12.4, 14.1, 16.0, 18.3, 21.0, 24.2, 27.9],
];

pub const WEIGHT_FOR_AGE_GIRLS: [Row; 61] = [
    [2.0, 2.4, 2.8, 3.2, 3.7, 4.2, 4.8],
    [2.7, 3.2, 3.6, 4.2, 4.8, 5.5, 6.2],
    [3.4, 3.9, 4.5, 5.1, 5.8, 6.6, 7.5],
    [4.0, 4.5, 5.2, 5.8, 6.6, 7.5, 8.5],
    [4.4, 5.0, 5.7, 6.4, 7.3, 8.2, 9.3],
    [4.8, 5.4, 6.1, 6.9, 7.8, 8.8, 10.0],
    [5.1, 5.7, 6.5, 7.3, 8.2, 9.3, 10.6],
    [5.3, 6.0, 6.8, 7.6, 8.6, 9.8, 11.1],
    [5.6, 6.3, 7.0, 7.9, 9.0, 10.2, 11.6],
    [5.8, 6.5, 7.3, 8.2, 9.3, 10.5, 12.0],
    [5.9, 6.7, 7.5, 8.5, 9.6, 10.9, 12.4],
    [6.1, 6.9, 7.7, 8.7, 9.9, 11.2, 12.8],
    [6.3, 7.0, 7.9, 8.9, 10.1, 11.5, 13.1],
    [6.4, 7.2, 8.1, 9.2, 10.4, 11.8, 13.5],
    [6.6, 7.4, 8.3, 9.4, 10.6, 12.1, 13.8],
    [6.7, 7.6, 8.5, 9.6, 10.9, 12.4, 14.1],
    [6.9, 7.7, 8.7, 9.8, 11.1, 12.6, 14.5],
    [7.0, 7.9, 8.9, 10.0, 11.4, 12.9, 14.8],
    [7.2, 8.1, 9.1, 10.2, 11.6, 13.2, 15.1],
    [7.3, 8.2, 9.2, 10.4, 11.8, 13.5, 15.4],
    [7.5, 8.4, 9.4, 10.6, 12.1, 13.7, 15.7],
    [7.6, 8.6, 9.6, 10.9, 12.3, 14.0, 16.0],
    [7.8, 8.7, 9.8, 11.1, 12.5, 14.3, 16.4],
    [7.9, 8.9, 10.0, 11.3, 12.8, 14.6, 16.7],
    [8.1, 9.0, 10.2, 11.5, 13.0, 14.8, 17.0],
    [8.2, 9.2, 10.3, 11.7, 13.3, 15.1, 17.3],
    [8.4, 9.4, 10.5, 11.9, 13.5, 15.4, 17.7],
    [8.5, 9.5, 10.7, 12.1, 13.7, 15.7, 18.0],
    [8.6, 9.7, 10.9, 12.3, 14.0, 16.0, 18.3],
    [8.8, 9.8, 11.1, 12.5, 14.2, 16.2, 18.7],
    [8.9, 10.0, 11.2, 12.7, 14.4, 16.5, 19.0],
    [9.0, 10.1, 11.4, 12.9, 14.7, 16.8, 19.3],
    [9.1, 10.3, 11.6, 13.1, 14.9, 17.1, 19.6],
    [9.3, 10.4, 11.7, 13.3, 15.1, 17.3, 20.0],
    [9.4, 10.5, 11.9, 13.5, 15.4, 17.6, 20.3],
    [9.5, 10.7, 12.0, 13.7, 15.6, 17.9, 20.6],
    [9.6, 10.8, 12.2, 13.9, 15.8, 18.1, 20.9],
    [9.7, 10.9, 12.4, 14.0, 16.0, 18.4, 21.3],
    [9.8, 11.1, 12.5, 14.2, 16.3, 18.7, 21.6],
    [9.9, 11.2, 12.7, 14.4, 16.5, 19.0, 22.0],
    [10.1, 11.3, 12.8, 14.6, 16.7, 19.2, 22.3],
    [10.2, 11.5, 13.0, 14.8, 16.9, 19.5, 22.7],
    [10.3, 11.6, 13.1, 15.0, 17.2, 19.8, 23.0],
    [10.4, 11.7, 13.3, 15.2, 17.4, 20.1, 23.4],
    [10.5, 11.8, 13.4, 15.3, 17.6, 20.4, 23.7],
    [10.6, 12.0, 13.6, 15.5, 17.8, 20.7, 24.1],
    [10.7, 12.1, 13.7, 15.7, 18.1, 20.9, 24.5],
    [10.8, 12.2, 13.9, 15.9, 18.3, 21.2, 24.8],
    [10.9, 12.3, 14.0, 16.1, 18.5, 21.5, 25.2],
    [11.0, 12.4, 14.2, 16.3, 18.8, 21.8, 25.5],
    [11.1, 12.6, 14.3, 16.4, 19.0, 22.1, 25.9],
    [11.2, 12.7, 14.5, 16.6, 19.2, 22.4, 26.3],
    [11.3, 12.8, 14.6, 16.8, 19.4, 22.6, 26.6],
    [11.4, 12.9, 14.8, 17.0, 19.7, 22.9, 27.0],
    [11.5, 13.0, 14.9, 17.2, 19.9, 23.2, 27.4],
    [11.6, 13.2, 15.1, 17.3, 20.1, 23.5, 27.7],
    [11.7, 13.3, 15.2, 17.5, 20.3, 23.8, 28.1],
    [11.8, 13.4, 15.3, 17.7, 20.6, 24.1, 28.5],
    [11.9, 13.5, 15.5, 17.9, 20.8, 24.4, 28.8],
    [12.0, 13.6, 15.6, 18.0, 21.0, 24.6, 29.2],
    [12.1, 13.7, 15.8, 18.2, 21.2, 24.9, 29.5],
];

pub const HEIGHT_FOR_AGE_BOYS: [Row; 61] = [
    [44.2, 46.1, 48.0, 49.9, 51.8, 53.7, 55.6],
    [48.9, 50.8, 52.8, 54.7, 56.7, 58.6, 60.6],
    [52.4, 54.4, 56.4, 58.4, 60.4, 62.4, 64.4],
    [55.3, 57.3, 59.4, 61.4, 63.5, 65.5, 67.6],
    [57.6, 59.7, 61.8, 63.9, 66.0, 68.0, 70.1],
    [59.6, 61.7, 63.8, 65.9, 68.0, 70.1, 72.2],
    [61.2, 63.3, 65.5, 67.6, 69.8, 71.9, 74.0],
    [62.7, 64.8, 67.0, 69.2, 71.3, 73.5, 75.7],
    [64.0, 66.2, 68.4, 70.6, 72.8, 75.0, 77.2],
    [65.2, 67.5, 69.7, 72.0, 74.2, 76.5, 78.7],
    [66.4, 68.7, 71.0, 73.3, 75.6, 77.9, 80.1],
    [67.6, 69.9, 72.2, 74.5, 76.9, 79.2, 81.5],
    [68.6, 71.0, 73.4, 75.7, 78.1, 80.5, 82.9],
    [69.6, 72.1, 74.5, 76.9, 79.3, 81.8, 84.2],
    [70.6, 73.1, 75.6, 78.0, 80.5, 83.0, 85.5],
    [71.6, 74.1, 76.6, 79.1, 81.7, 84.2, 86.7],
    [72.5, 75.0, 77.6, 80.2, 82.8, 85.4, 88.0],
    [73.3, 76.0, 78.6, 81.2, 83.9, 86.5, 89.2],
    [74.2, 76.9, 79.6, 82.3, 85.0, 87.7, 90.4],
    [75.0, 77.7, 80.5, 83.2, 86.0, 88.8, 91.5],
    [75.8, 78.6, 81.4, 84.2, 87.0, 89.8, 92.6],
    [76.5, 79.4, 82.3, 85.1, 88.0, 90.9, 93.8],
    [77.2, 80.2, 83.1, 86.0, 89.0, 91.9, 94.9],
    [78.0, 81.0, 83.9, 86.9, 89.9, 92.9, 95.9],
    [78.7, 81.7, 84.8, 87.8, 90.9, 93.9, 97.0],
    [78.6, 81.7, 84.9, 88.0, 91.1, 94.2, 97.3],
    [79.3, 82.5, 85.6, 88.8, 92.0, 95.2, 98.3],
    [79.9, 83.1, 86.4, 89.6, 92.9, 96.1, 99.3],
    [80.5, 83.8, 87.1, 90.4, 93.7, 97.0, 100.3],
    [81.1, 84.5, 87.8, 91.2, 94.5, 97.9, 101.2],
    [81.7, 85.1, 88.5, 91.9, 95.3, 98.7, 102.1],
    [82.3, 85.7, 89.2, 92.7, 96.1, 99.6, 103.0],
    [82.8, 86.4, 89.9, 93.4, 96.9, 100.4, 103.9],
    [83.4, 86.9, 90.5, 94.1, 97.6, 101.2, 104.8],
    [83.9, 87.5, 91.1, 94.8, 98.4, 102.0, 105.6],
    [84.4, 88.1, 91.8, 95.4, 99.1, 102.7, 106.4],
    [85.0, 88.7, 92.4, 96.1, 99.8, 103.5, 107.2],
    [85.5, 89.2, 93.0, 96.7, 100.5, 104.2, 108.0],
    [86.0, 89.8, 93.6, 97.4, 101.2, 105.0, 108.8],
    [86.5, 90.3, 94.2, 98.0, 101.8, 105.7, 109.5],
    [87.0, 90.9, 94.7, 98.6, 102.5, 106.4, 110.3],
    [87.5, 91.4, 95.3, 99.2, 103.2, 107.1, 111.0],
    [88.0, 91.9, 95.9, 99.9, 103.8, 107.8, 111.7],
    [88.4, 92.4, 96.4, 100.4, 104.5, 108.5, 112.5],
    [88.9, 93.0, 97.0, 101.0, 105.1, 109.1, 113.2],
    [89.4, 93.5, 97.5, 101.6, 105.7, 109.8, 113.9],
    [89.8, 94.0, 98.1, 102.2, 106.3, 110.4, 114.6],
    [90.3, 94.4, 98.6, 102.8, 106.9, 111.1, 115.2],
    [90.7, 94.9, 99.1, 103.3, 107.5, 111.7, 115.9],
    [91.2, 95.4, 99.7, 103.9, 108.1, 112.4, 116.6],
    [91.6, 95.9, 100.2, 104.4, 108.7, 113.0, 117.3],
    [92.1, 96.4, 100.7, 105.0, 109.3, 113.6, 117.9],
    [92.5, 96.9, 101.2, 105.6, 109.9, 114.2, 118.6],
    [93.0, 97.4, 101.7, 106.1, 110.5, 114.9, 119.2],
    [93.4, 97.8, 102.3, 106.7, 111.1, 115.5, 119.9],
    [93.9, 98.3, 102.8, 107.2, 111.7, 116.1, 120.6],
    [94.3, 98.8, 103.3, 107.8, 112.3, 116.7, 121.2],
    [94.7, 99.3, 103.8, 108.3, 112.8, 117.4, 121.9],
    [95.2, 99.7, 104.3, 108.9, 113.4, 118.0, 122.6],
    [95.6, 100.2, 104.8, 109.4, 114.0, 118.6, 123.2],
    [96.1, 100.7, 105.3, 110.0, 114.6, 119.2, 123.9],
];

pub const HEIGHT_FOR_AGE_GIRLS: [Row; 61] = [
    [43.6, 45.4, 47.3, 49.1, 51.0, 52.9, 54.7],
    [47.8, 49.8, 51.7, 53.7, 55.6, 57.6, 59.5],
    [51.0, 53.0, 55.0, 57.1, 59.1, 61.1, 63.2],
    [53.5, 55.6, 57.7, 59.8, 61.9, 64.0, 66.1],
    [55.6, 57.8, 59.9, 62.1, 64.3, 66.4, 68.6],
    [57.4, 59.6, 61.8, 64.0, 66.2, 68.5, 70.7],
    [58.9, 61.2, 63.5, 65.7, 68.0, 70.3, 72.5],
    [60.3, 62.7, 65.0, 67.3, 69.6, 71.9, 74.2],
    [61.7, 64.0, 66.4, 68.7, 71.1, 73.5, 75.8],
    [62.9, 65.3, 67.7, 70.1, 72.6, 75.0, 77.4],
    [64.1, 66.5, 69.0, 71.5, 73.9, 76.4, 78.9],
    [65.2, 67.7, 70.3, 72.8, 75.3, 77.8, 80.3],
    [66.3, 68.9, 71.4, 74.0, 76.6, 79.2, 81.7],
    [67.3, 70.0, 72.6, 75.2, 77.8, 80.5, 83.1],
    [68.3, 71.0, 73.7, 76.4, 79.1, 81.7, 84.4],
    [69.3, 72.0, 74.8, 77.5, 80.2, 83.0, 85.7],
    [70.2, 73.0, 75.8, 78.6, 81.4, 84.2, 87.0],
    [71.1, 74.0, 76.8, 79.7, 82.5, 85.4, 88.2],
    [72.0, 74.9, 77.8, 80.7, 83.6, 86.5, 89.4],
    [72.8, 75.8, 78.8, 81.7, 84.7, 87.6, 90.6],
    [73.7, 76.7, 79.7, 82.7, 85.7, 88.7, 91.7],
    [74.5, 77.5, 80.6, 83.7, 86.7, 89.8, 92.9],
    [75.2, 78.4, 81.5, 84.6, 87.7, 90.8, 94.0],
    [76.0, 79.2, 82.3, 85.5, 88.7, 91.9, 95.0],
    [76.7, 80.0, 83.2, 86.4, 89.6, 92.9, 96.1],
    [76.8, 80.0, 83.3, 86.6, 89.9, 93.1, 96.4],
    [77.5, 80.8, 84.1, 87.4, 90.8, 94.1, 97.4],
    [78.1, 81.5, 84.9, 88.3, 91.7, 95.0, 98.4],
    [78.8, 82.2, 85.7, 89.1, 92.5, 96.0, 99.4],
    [79.5, 82.9, 86.4, 89.9, 93.4, 96.9, 100.3],
    [80.1, 83.6, 87.1, 90.7, 94.2, 97.7, 101.3],
    [80.7, 84.3, 87.9, 91.4, 95.0, 98.6, 102.2],
    [81.3, 84.9, 88.6, 92.2, 95.8, 99.4, 103.1],
    [81.9, 85.6, 89.3, 92.9, 96.6, 100.3, 103.9],
    [82.5, 86.2, 89.9, 93.6, 97.4, 101.1, 104.8],
    [83.1, 86.8, 90.6, 94.4, 98.1, 101.9, 105.6],
    [83.6, 87.4, 91.2, 95.1, 98.9, 102.7, 106.5],
    [84.2, 88.0, 91.9, 95.7, 99.6, 103.4, 107.3],
    [84.7, 88.6, 92.5, 96.4, 100.3, 104.2, 108.1],
    [85.3, 89.2, 93.1, 97.1, 101.0, 105.0, 108.9],
    [85.8, 89.8, 93.8, 97.7, 101.7, 105.7, 109.7],
    [86.3, 90.4, 94.4, 98.4, 102.4, 106.4, 110.5],
    [86.8, 90.9, 95.0, 99.0, 103.1, 107.2, 111.2],
    [87.4, 91.5, 95.6, 99.7, 103.8, 107.9, 112.0],
    [87.9, 92.0, 96.2, 100.3, 104.5, 108.6, 112.7],
    [88.4, 92.5, 96.7, 100.9, 105.1, 109.3, 113.5],
    [88.9, 93.1, 97.3, 101.5, 105.8, 110.0, 114.2],
    [89.3, 93.6, 97.9, 102.1, 106.4, 110.7, 114.9],
    [89.8, 94.1, 98.4, 102.7, 107.0, 111.3, 115.7],
    [90.3, 94.6, 99.0, 103.3, 107.7, 112.0, 116.4],
    [90.7, 95.1, 99.5, 103.9, 108.3, 112.7, 117.1],
    [91.2, 95.6, 100.1, 104.5, 108.9, 113.3, 117.7],
    [91.7, 96.1, 100.6, 105.1, 109.5, 114.0, 118.4],
    [92.1, 96.6, 101.1, 105.6, 110.1, 114.6, 119.1],
    [92.6, 97.1, 101.6, 106.2, 110.7, 115.3, 119.8],
    [93.0, 97.6, 102.2, 106.7, 111.3, 115.9, 120.5],
    [93.5, 98.1, 102.7, 107.3, 111.9, 116.5, 121.1],
    [93.9, 98.5, 103.2, 107.8, 112.5, 117.1, 121.8],
    [94.3, 99.0, 103.7, 108.4, 113.1, 117.8, 122.4],
    [94.8, 99.5, 104.2, 108.9, 113.7, 118.4, 123.1],
    [95.2, 100.0, 104.7, 109.5, 114.2, 119.0, 123.8],
];

pub const WEIGHT_FOR_HEIGHT_BOYS: [Row; 151] = [
    [1.9, 2.0, 2.2, 2.4, 2.7, 3.0, 3.3],
    [1.9, 2.1, 2.3, 2.5, 2.8, 3.1, 3.4],
    [2.0, 2.2, 2.4, 2.6, 2.9, 3.1, 3.5],
    [2.1, 2.3, 2.5, 2.7, 3.0, 3.2, 3.6],
    [2.1, 2.3, 2.5, 2.8, 3.0, 3.3, 3.7],
    [2.2, 2.4, 2.6, 2.9, 3.1, 3.4, 3.8],
    [2.3, 2.5, 2.7, 2.9, 3.2, 3.6, 3.9],
    [2.3, 2.6, 2.8, 3.0, 3.3, 3.7, 4.0],
    [2.4, 2.6, 2.9, 3.1, 3.4, 3.8, 4.2],
    [2.5, 2.7, 3.0, 3.2, 3.5, 3.9, 4.3],
    [2.6, 2.8, 3.0, 3.3, 3.6, 4.0, 4.4],
    [2.7, 2.9, 3.1, 3.4, 3.8, 4.1, 4.5],
    [2.7, 3.0, 3.2, 3.5, 3.9, 4.2, 4.7],
    [2.8, 3.1, 3.3, 3.6, 4.0, 4.4, 4.8],
    [2.9, 3.2, 3.5, 3.8, 4.1, 4.5, 5.0],
    [3.0, 3.3, 3.6, 3.9, 4.2, 4.6, 5.1],
    [3.1, 3.4, 3.7, 4.0, 4.4, 4.8, 5.3],
    [3.2, 3.5, 3.8, 4.1, 4.5, 4.9, 5.4],
    [3.3, 3.6, 3.9, 4.3, 4.7, 5.1, 5.6],
    [3.4, 3.7, 4.0, 4.4, 4.8, 5.3, 5.8],
    [3.6, 3.8, 4.2, 4.5, 5.0, 5.4, 6.0],
    [3.7, 4.0, 4.3, 4.7, 5.1, 5.6, 6.1],
    [3.8, 4.1, 4.4, 4.8, 5.3, 5.8, 6.3],
    [3.9, 4.2, 4.6, 5.0, 5.4, 5.9, 6.5],
    [4.0, 4.3, 4.7, 5.1, 5.6, 6.1, 6.7],
    [4.1, 4.5, 4.9, 5.3, 5.7, 6.3, 6.9],
    [4.3, 4.6, 5.0, 5.4, 5.9, 6.4, 7.1],
    [4.4, 4.7, 5.1, 5.6, 6.1, 6.6, 7.2],
    [4.5, 4.8, 5.3, 5.7, 6.2, 6.8, 7.4],
    [4.6, 5.0, 5.4, 5.9, 6.4, 7.0, 7.6],
    [4.7, 5.1, 5.5, 6.0, 6.5, 7.1, 7.8],
    [4.8, 5.2, 5.6, 6.1, 6.7, 7.3, 8.0],
    [4.9, 5.3, 5.8, 6.3, 6.8, 7.4, 8.1],
    [5.0, 5.4, 5.9, 6.4, 7.0, 7.6, 8.3],
    [5.1, 5.6, 6.0, 6.5, 7.1, 7.7, 8.5],
    [5.2, 5.7, 6.1, 6.7, 7.2, 7.9, 8.6],
    [5.3, 5.8, 6.2, 6.8, 7.4, 8.0, 8.8],
    [5.4, 5.9, 6.4, 6.9, 7.5, 8.2, 8.9],
    [5.5, 6.0, 6.5, 7.0, 7.6, 8.3, 9.1],
    [5.6, 6.1, 6.6, 7.1, 7.8, 8.5, 9.3],
    [5.9, 6.3, 6.9, 7.4, 8.1, 8.8, 9.6],
    [6.0, 6.4, 7.0, 7.6, 8.2, 8.9, 9.8],
    [6.1, 6.5, 7.1, 7.7, 8.3, 9.1, 9.9],
    [6.1, 6.6, 7.2, 7.8, 8.5, 9.2, 10.1],
    [6.2, 6.7, 7.3, 7.9, 8.6, 9.4, 10.2],
    [6.3, 6.8, 7.4, 8.0, 8.7, 9.5, 10.4],
    [6.4, 6.9, 7.5, 8.1, 8.8, 9.6, 10.5],
    [6.5, 7.0, 7.6, 8.2, 9.0, 9.8, 10.7],
    [6.6, 7.1, 7.7, 8.4, 9.1, 9.9, 10.8],
    [6.7, 7.2, 7.8, 8.5, 9.2, 10.0, 11.0],
    [6.8, 7.3, 7.9, 8.6, 9.3, 10.2, 11.1],
    [6.9, 7.4, 8.0, 8.7, 9.5, 10.3, 11.3],
    [6.9, 7.5, 8.1, 8.8, 9.6, 10.4, 11.4],
    [7.0, 7.6, 8.2, 8.9, 9.7, 10.6, 11.6],
    [7.1, 7.7, 8.3, 9.0, 9.8, 10.7, 11.7],
    [7.2, 7.8, 8.4, 9.1, 9.9, 10.8, 11.8],
    [7.3, 7.9, 8.5, 9.2, 10.0, 11.0, 12.0],
    [7.4, 7.9, 8.6, 9.3, 10.2, 11.1, 12.1],
    [7.4, 8.0, 8.7, 9.4, 10.3, 11.2, 12.3],
    [7.5, 8.1, 8.8, 9.5, 10.4, 11.3, 12.4],
    [7.6, 8.2, 8.9, 9.6, 10.5, 11.4, 12.5],
    [7.7, 8.3, 9.0, 9.7, 10.6, 11.6, 12.6],
    [7.7, 8.4, 9.1, 9.8, 10.7, 11.7, 12.8],
    [7.8, 8.5, 9.2, 9.9, 10.8, 11.8, 12.9],
    [7.9, 8.5, 9.2, 10.0, 10.9, 11.9, 13.0],
    [8.0, 8.6, 9.3, 10.1, 11.0, 12.0, 13.1],
    [8.1, 8.7, 9.4, 10.2, 11.1, 12.1, 13.2],
    [8.1, 8.8, 9.5, 10.3, 11.2, 12.2, 13.3],
    [8.2, 8.9, 9.6, 10.4, 11.3, 12.3, 13.5],
    [8.3, 8.9, 9.7, 10.5, 11.4, 12.4, 13.6],
    [8.4, 9.0, 9.8, 10.6, 11.5, 12.5, 13.7],
    [8.4, 9.1, 9.8, 10.7, 11.6, 12.6, 13.8],
    [8.5, 9.2, 9.9, 10.8, 11.7, 12.7, 13.9],
    [8.6, 9.3, 10.0, 10.9, 11.8, 12.9, 14.0],
    [8.7, 9.4, 10.1, 11.0, 11.9, 13.0, 14.2],
    [8.8, 9.5, 10.2, 11.1, 12.0, 13.1, 14.3],
    [8.9, 9.6, 10.3, 11.2, 12.2, 13.2, 14.5],
    [9.0, 9.7, 10.4, 11.3, 12.3, 13.4, 14.6],
    [9.0, 9.8, 10.5, 11.4, 12.4, 13.5, 14.7],
    [9.1, 9.9, 10.7, 11.5, 12.5, 13.7, 14.9],
    [9.2, 10.0, 10.8, 11.7, 12.7, 13.8, 15.1],
    [9.3, 10.1, 10.9, 11.8, 12.8, 13.9, 15.2],
    [9.4, 10.2, 11.0, 11.9, 12.9, 14.1, 15.4],
    [9.5, 10.3, 11.1, 12.0, 13.1, 14.2, 15.5],
    [9.6, 10.4, 11.2, 12.2, 13.2, 14.4, 15.7],
    [9.7, 10.5, 11.3, 12.3, 13.3, 14.5, 15.9],
    [9.8, 10.6, 11.5, 12.4, 13.5, 14.7, 16.0],
    [9.9, 10.7, 11.6, 12.5, 13.6, 14.8, 16.2],
    [10.0, 10.8, 11.7, 12.6, 13.7, 15.0, 16.3],
    [10.1, 10.9, 11.8, 12.8, 13.9, 15.1, 16.5],
    [10.2, 11.0, 11.9, 12.9, 14.0, 15.2, 16.6],
    [10.3, 11.1, 12.0, 13.0, 14.1, 15.4, 16.8],
    [10.4, 11.2, 12.1, 13.1, 14.3, 15.5, 17.0],
    [10.5, 11.3, 12.2, 13.2, 14.4, 15.7, 17.1],
    [10.5, 11.4, 12.3, 13.4, 14.5, 15.8, 17.3],
    [10.6, 11.5, 12.4, 13.5, 14.6, 16.0, 17.4],
    [10.7, 11.6, 12.5, 13.6, 14.8, 16.1, 17.6],
    [10.8, 11.7, 12.6, 13.7, 14.9, 16.2, 17.7],
    [10.9, 11.8, 12.7, 13.8, 15.0, 16.4, 17.9],
    [11.0, 11.9, 12.8, 13.9, 15.2, 16.5, 18.1],
    [11.1, 12.0, 13.0, 14.1, 15.3, 16.7, 18.2],
    [11.2, 12.1, 13.1, 14.2, 15.4, 16.8, 18.4],
    [11.3, 12.2, 13.2, 14.3, 15.6, 17.0, 18.6],
    [11.4, 12.3, 13.3, 14.4, 15.7, 17.1, 18.7],
    [11.5, 12.4, 13.4, 14.6, 15.8, 17.3, 18.9],
    [11.6, 12.5, 13.5, 14.7, 16.0, 17.4, 19.1],
    [11.7, 12.6, 13.6, 14.8, 16.1, 17.6, 19.3],
    [11.8, 12.7, 13.8, 14.9, 16.3, 17.8, 19.4],
    [11.9, 12.8, 13.9, 15.1, 16.4, 17.9, 19.6],
    [12.0, 12.9, 14.0, 15.2, 16.6, 18.1, 19.8],
    [12.1, 13.0, 14.1, 15.4, 16.7, 18.3, 20.0],
    [12.2, 13.2, 14.3, 15.5, 16.9, 18.4, 20.2],
    [12.3, 13.3, 14.4, 15.6, 17.0, 18.6, 20.4],
    [12.4, 13.4, 14.5, 15.8, 17.2, 18.8, 20.6],
    [12.5, 13.5, 14.7, 15.9, 17.4, 19.0, 20.8],
    [12.6, 13.6, 14.8, 16.1, 17.5, 19.1, 21.0],
    [12.7, 13.8, 14.9, 16.2, 17.7, 19.3, 21.2],
    [12.8, 13.9, 15.1, 16.4, 17.9, 19.5, 21.4],
    [12.9, 14.0, 15.2, 16.5, 18.0, 19.7, 21.6],
    [13.1, 14.1, 15.3, 16.7, 18.2, 19.9, 21.8],
    [13.2, 14.3, 15.5, 16.8, 18.4, 20.1, 22.0],
    [13.3, 14.4, 15.6, 17.0, 18.5, 20.3, 22.3],
    [13.4, 14.5, 15.8, 17.2, 18.7, 20.5, 22.5],
    [13.5, 14.7, 15.9, 17.3, 18.9, 20.7, 22.7],
    [13.7, 14.8, 16.1, 17.5, 19.1, 20.9, 22.9],
    [13.8, 14.9, 16.2, 17.7, 19.3, 21.1, 23.2],
    [13.9, 15.1, 16.4, 17.8, 19.5, 21.3, 23.4],
    [14.0, 15.2, 16.5, 18.0, 19.6, 21.5, 23.6],
    [14.2, 15.3, 16.7, 18.2, 19.8, 21.7, 23.9],
    [14.3, 15.5, 16.8, 18.3, 20.0, 21.9, 24.1],
    [14.4, 15.6, 17.0, 18.5, 20.2, 22.2, 24.4],
    [14.5, 15.8, 17.2, 18.7, 20.4, 22.4, 24.6],
    [14.7, 15.9, 17.3, 18.9, 20.6, 22.6, 24.9],
    [14.8, 16.1, 17.5, 19.1, 20.8, 22.8, 25.1],
    [15.0, 16.2, 17.6, 19.2, 21.0, 23.1, 25.4],
    [15.1, 16.4, 17.8, 19.4, 21.3, 23.3, 25.6],
    [15.2, 16.5, 18.0, 19.6, 21.5, 23.5, 25.9],
    [15.4, 16.7, 18.2, 19.8, 21.7, 23.8, 26.2],
    [15.5, 16.8, 18.3, 20.0, 21.9, 24.0, 26.4],
    [15.6, 17.0, 18.5, 20.2, 22.1, 24.3, 26.7],
    [15.8, 17.2, 18.7, 20.4, 22.3, 24.5, 27.0],
    [15.9, 17.3, 18.8, 20.6, 22.5, 24.7, 27.3],
    [16.1, 17.5, 19.0, 20.8, 22.8, 25.0, 27.5],
    [16.2, 17.6, 19.2, 21.0, 23.0, 25.2, 27.8],
    [16.4, 17.8, 19.4, 21.2, 23.2, 25.5, 28.1],
    [16.5, 17.9, 19.6, 21.4, 23.4, 25.7, 28.4],
    [16.6, 18.1, 19.7, 21.6, 23.6, 26.0, 28.7],
    [16.8, 18.3, 19.9, 21.8, 23.9, 26.2, 28.9],
    [16.9, 18.4, 20.1, 22.0, 24.1, 26.5, 29.2],
    [17.1, 18.6, 20.3, 22.2, 24.3, 26.7, 29.5],
    [17.2, 18.7, 20.4, 22.4, 24.5, 27.0, 29.8],
];

pub const WEIGHT_FOR_HEIGHT_GIRLS: [Row; 151] = [
    [1.9, 2.1, 2.3, 2.5, 2.7, 3.0, 3.3],
    [2.0, 2.1, 2.3, 2.5, 2.8, 3.1, 3.4],
    [2.0, 2.2, 2.4, 2.6, 2.9, 3.2, 3.5],
    [2.1, 2.3, 2.5, 2.7, 3.0, 3.3, 3.6],
    [2.2, 2.4, 2.6, 2.8, 3.1, 3.4, 3.7],
    [2.2, 2.4, 2.6, 2.9, 3.2, 3.5, 3.8],
    [2.3, 2.5, 2.7, 3.0, 3.3, 3.6, 4.0],
    [2.4, 2.6, 2.8, 3.1, 3.4, 3.7, 4.1],
    [2.4, 2.6, 2.9, 3.2, 3.5, 3.8, 4.2],
    [2.5, 2.7, 3.0, 3.3, 3.6, 3.9, 4.3],
    [2.6, 2.8, 3.1, 3.4, 3.7, 4.0, 4.5],
    [2.7, 2.9, 3.2, 3.5, 3.8, 4.2, 4.6],
    [2.8, 3.0, 3.3, 3.6, 3.9, 4.3, 4.8],
    [2.8, 3.1, 3.4, 3.7, 4.0, 4.4, 4.9],
    [2.9, 3.2, 3.5, 3.8, 4.2, 4.6, 5.1],
    [3.0, 3.3, 3.6, 3.9, 4.3, 4.7, 5.2],
    [3.1, 3.4, 3.7, 4.0, 4.4, 4.9, 5.4],
    [3.2, 3.5, 3.8, 4.2, 4.6, 5.0, 5.5],
    [3.3, 3.6, 3.9, 4.3, 4.7, 5.2, 5.7],
    [3.4, 3.7, 4.0, 4.4, 4.8, 5.3, 5.9],
    [3.5, 3.8, 4.2, 4.5, 5.0, 5.5, 6.1],
    [3.6, 3.9, 4.3, 4.7, 5.1, 5.7, 6.3],
    [3.7, 4.0, 4.4, 4.8, 5.3, 5.8, 6.4],
    [3.8, 4.1, 4.5, 5.0, 5.4, 6.0, 6.6],
    [3.9, 4.3, 4.6, 5.1, 5.6, 6.1, 6.8],
    [4.0, 4.4, 4.8, 5.2, 5.7, 6.3, 7.0],
    [4.1, 4.5, 4.9, 5.4, 5.9, 6.5, 7.1],
    [4.2, 4.6, 5.0, 5.5, 6.0, 6.6, 7.3],
    [4.3, 4.7, 5.1, 5.6, 6.2, 6.8, 7.5],
    [4.4, 4.8, 5.3, 5.7, 6.3, 6.9, 7.7],
    [4.5, 4.9, 5.4, 5.9, 6.4, 7.1, 7.8],
    [4.6, 5.0, 5.5, 6.0, 6.6, 7.3, 8.0],
    [4.7, 5.1, 5.6, 6.1, 6.7, 7.4, 8.2],
    [4.8, 5.2, 5.7, 6.3, 6.9, 7.6, 8.4],
    [4.9, 5.3, 5.8, 6.4, 7.0, 7.7, 8.5],
    [5.0, 5.4, 5.9, 6.5, 7.1, 7.8, 8.7],
    [5.1, 5.5, 6.0, 6.6, 7.3, 8.0, 8.8],
    [5.2, 5.6, 6.2, 6.7, 7.4, 8.1, 9.0],
    [5.3, 5.7, 6.3, 6.9, 7.5, 8.3, 9.1],
    [5.4, 5.8, 6.4, 7.0, 7.6, 8.4, 9.3],
    [5.6, 6.1, 6.6, 7.2, 7.9, 8.7, 9.6],
    [5.7, 6.2, 6.7, 7.4, 8.1, 8.9, 9.8],
    [5.8, 6.3, 6.8, 7.5, 8.2, 9.0, 9.9],
    [5.9, 6.4, 6.9, 7.6, 8.3, 9.1, 10.1],
    [5.9, 6.5, 7.0, 7.7, 8.4, 9.2, 10.2],
    [6.0, 6.6, 7.1, 7.8, 8.5, 9.4, 10.3],
    [6.1, 6.6, 7.2, 7.9, 8.6, 9.5, 10.5],
    [6.2, 6.7, 7.3, 8.0, 8.8, 9.6, 10.6],
    [6.3, 6.8, 7.4, 8.1, 8.9, 9.7, 10.7],
    [6.4, 6.9, 7.5, 8.2, 9.0, 9.9, 10.9],
    [6.4, 7.0, 7.6, 8.3, 9.1, 10.0, 11.0],
    [6.5, 7.1, 7.7, 8.4, 9.2, 10.1, 11.1],
    [6.6, 7.2, 7.8, 8.5, 9.3, 10.2, 11.2],
    [6.7, 7.3, 7.9, 8.6, 9.4, 10.3, 11.4],
    [6.8, 7.3, 8.0, 8.7, 9.5, 10.4, 11.5],
    [6.9, 7.4, 8.1, 8.8, 9.6, 10.6, 11.6],
    [6.9, 7.5, 8.2, 8.9, 9.7, 10.7, 11.7],
    [7.0, 7.6, 8.3, 9.0, 9.8, 10.8, 11.9],
    [7.1, 7.7, 8.3, 9.1, 9.9, 10.9, 12.0],
    [7.2, 7.8, 8.4, 9.2, 10.0, 11.0, 12.1],
    [7.2, 7.8, 8.5, 9.3, 10.1, 11.1, 12.2],
    [7.3, 7.9, 8.6, 9.4, 10.2, 11.2, 12.3],
    [7.4, 8.0, 8.7, 9.5, 10.3, 11.3, 12.4],
    [7.5, 8.1, 8.8, 9.6, 10.4, 11.4, 12.6],
    [7.5, 8.2, 8.9, 9.6, 10.5, 11.5, 12.7],
    [7.6, 8.2, 8.9, 9.7, 10.6, 11.6, 12.8],
    [7.7, 8.3, 9.0, 9.8, 10.7, 11.8, 12.9],
    [7.8, 8.4, 9.1, 9.9, 10.8, 11.9, 13.0],
    [7.8, 8.5, 9.2, 10.0, 10.9, 12.0, 13.2],
    [7.9, 8.6, 9.3, 10.1, 11.1, 12.1, 13.3],
    [8.0, 8.7, 9.4, 10.2, 11.2, 12.2, 13.4],
    [8.1, 8.8, 9.5, 10.3, 11.3, 12.3, 13.6],
    [8.2, 8.8, 9.6, 10.4, 11.4, 12.5, 13.7],
    [8.3, 8.9, 9.7, 10.6, 11.5, 12.6, 13.8],
    [8.3, 9.0, 9.8, 10.7, 11.6, 12.7, 14.0],
    [8.4, 9.1, 9.9, 10.8, 11.8, 12.9, 14.1],
    [8.5, 9.2, 10.0, 10.9, 11.9, 13.0, 14.3],
    [8.6, 9.3, 10.1, 11.0, 12.0, 13.2, 14.5],
    [8.7, 9.4, 10.2, 11.1, 12.2, 13.3, 14.6],
    [8.8, 9.5, 10.4, 11.3, 12.3, 13.5, 14.8],
    [8.9, 9.6, 10.5, 11.4, 12.4, 13.6, 15.0],
    [9.0, 9.7, 10.6, 11.5, 12.6, 13.8, 15.1],
    [9.1, 9.9, 10.7, 11.6, 12.7, 13.9, 15.3],
    [9.2, 10.0, 10.8, 11.8, 12.8, 14.1, 15.5],
    [9.3, 10.1, 10.9, 11.9, 13.0, 14.2, 15.6],
    [9.4, 10.2, 11.0, 12.0, 13.1, 14.4, 15.8],
    [9.5, 10.3, 11.2, 12.1, 13.3, 14.5, 16.0],
    [9.6, 10.4, 11.3, 12.3, 13.4, 14.7, 16.1],
    [9.7, 10.5, 11.4, 12.4, 13.5, 14.8, 16.3],
    [9.8, 10.6, 11.5, 12.5, 13.7, 15.0, 16.5],
    [9.9, 10.7, 11.6, 12.6, 13.8, 15.1, 16.6],
    [10.0, 10.8, 11.7, 12.8, 14.0, 15.3, 16.8],
    [10.1, 10.9, 11.8, 12.9, 14.1, 15.4, 17.0],
    [10.1, 11.0, 11.9, 13.0, 14.2, 15.6, 17.2],
    [10.2, 11.1, 12.1, 13.1, 14.4, 15.7, 17.3],
    [10.3, 11.2, 12.2, 13.3, 14.5, 15.9, 17.5],
    [10.4, 11.3, 12.3, 13.4, 14.6, 16.1, 17.7],
    [10.5, 11.4, 12.4, 13.5, 14.8, 16.2, 17.8],
    [10.6, 11.5, 12.5, 13.6, 14.9, 16.4, 18.0],
    [10.7, 11.6, 12.6, 13.8, 15.1, 16.5, 18.2],
    [10.8, 11.7, 12.7, 13.9, 15.2, 16.7, 18.4],
    [10.9, 11.8, 12.9, 14.0, 15.3, 16.8, 18.5],
    [11.0, 11.9, 13.0, 14.2, 15.5, 17.0, 18.7],
    [11.1, 12.0, 13.1, 14.3, 15.6, 17.1, 18.9],
    [11.2, 12.2, 13.2, 14.4, 15.8, 17.3, 19.1],
    [11.3, 12.3, 13.3, 14.5, 15.9, 17.5, 19.2],
    [11.4, 12.4, 13.5, 14.7, 16.1, 17.6, 19.4],
    [11.5, 12.5, 13.6, 14.8, 16.2, 17.8, 19.6],
    [11.6, 12.6, 13.7, 14.9, 16.4, 18.0, 19.8],
    [11.7, 12.7, 13.8, 15.1, 16.5, 18.1, 20.0],
    [11.8, 12.8, 13.9, 15.2, 16.7, 18.3, 20.2],
    [11.9, 12.9, 14.1, 15.4, 16.8, 18.5, 20.4],
    [12.0, 13.0, 14.2, 15.5, 17.0, 18.6, 20.6],
    [12.1, 13.2, 14.3, 15.6, 17.1, 18.8, 20.7],
    [12.2, 13.3, 14.5, 15.8, 17.3, 19.0, 20.9],
    [12.3, 13.4, 14.6, 15.9, 17.4, 19.2, 21.1],
    [12.4, 13.5, 14.7, 16.1, 17.6, 19.3, 21.3],
    [12.5, 13.6, 14.8, 16.2, 17.8, 19.5, 21.5],
    [12.7, 13.8, 15.0, 16.4, 17.9, 19.7, 21.7],
    [12.8, 13.9, 15.1, 16.5, 18.1, 19.9, 22.0],
    [12.9, 14.0, 15.2, 16.7, 18.3, 20.1, 22.2],
    [13.0, 14.1, 15.4, 16.8, 18.4, 20.3, 22.4],
    [13.1, 14.2, 15.5, 17.0, 18.6, 20.5, 22.6],
    [13.2, 14.4, 15.7, 17.1, 18.8, 20.7, 22.8],
    [13.3, 14.5, 15.8, 17.3, 19.0, 20.9, 23.0],
    [13.5, 14.6, 16.0, 17.4, 19.1, 21.1, 23.3],
    [13.6, 14.8, 16.1, 17.6, 19.3, 21.3, 23.5],
    [13.7, 14.9, 16.2, 17.8, 19.5, 21.5, 23.7],
    [13.8, 15.0, 16.4, 17.9, 19.7, 21.7, 23.9],
    [14.0, 15.2, 16.5, 18.1, 19.9, 21.9, 24.2],
    [14.1, 15.3, 16.7, 18.3, 20.1, 22.1, 24.4],
    [14.2, 15.5, 16.9, 18.4, 20.2, 22.3, 24.7],
    [14.3, 15.6, 17.0, 18.6, 20.4, 22.5, 24.9],
    [14.5, 15.7, 17.2, 18.8, 20.6, 22.7, 25.1],
    [14.6, 15.9, 17.3, 19.0, 20.8, 23.0, 25.4],
    [14.7, 16.0, 17.5, 19.2, 21.0, 23.2, 25.6],
    [14.9, 16.2, 17.7, 19.3, 21.2, 23.4, 25.9],
    [15.0, 16.3, 17.8, 19.5, 21.4, 23.6, 26.1],
    [15.1, 16.5, 18.0, 19.7, 21.6, 23.9, 26.4],
    [15.3, 16.6, 18.2, 19.9, 21.8, 24.1, 26.7],
    [15.4, 16.8, 18.3, 20.1, 22.1, 24.3, 26.9],
    [15.6, 16.9, 18.5, 20.3, 22.3, 24.6, 27.2],
    [15.7, 17.1, 18.7, 20.4, 22.5, 24.8, 27.5],
    [15.8, 17.2, 18.8, 20.6, 22.7, 25.0, 27.7],
    [16.0, 17.4, 19.0, 20.8, 22.9, 25.3, 28.0],
    [16.1, 17.6, 19.2, 21.0, 23.1, 25.5, 28.3],
    [16.3, 17.7, 19.4, 21.2, 23.3, 25.8, 28.5],
    [16.4, 17.9, 19.5, 21.4, 23.6, 26.0, 28.8],
    [16.6, 18.0, 19.7, 21.6, 23.8, 26.2, 29.1],
    [16.7, 18.2, 19.9, 21.8, 24.0, 26.5, 29.4],
    [16.9, 18.4, 20.1, 22.0, 24.2, 26.7, 29.6],
];
